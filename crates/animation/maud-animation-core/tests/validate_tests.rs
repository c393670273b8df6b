use maud_animation_core::{
    interp::IDENTITY_QUAT, parse_animation_json, parse_skeleton_json, validate_animation,
    validate_skeleton, Animation, AnimationError, Bone, Keyframes, Skeleton, Track, Transform,
    ValidationConfig, NO_BONE_NAME, RETARGETED_POSE_NAME,
};

fn two_bones() -> Skeleton {
    Skeleton::new(vec![
        Bone::root("root", Transform::IDENTITY),
        Bone::child("tip", 0, Transform::from_translation([0.0, 1.0, 0.0])),
    ])
}

fn keys(times: &[f32]) -> Keyframes {
    Keyframes {
        times: times.to_vec(),
        translations: vec![[0.0; 3]; times.len()],
        rotations: vec![IDENTITY_QUAT; times.len()],
        scales: None,
    }
}

fn check(anim: &Animation) -> Result<(), AnimationError> {
    validate_animation(anim, &two_bones(), &ValidationConfig::default())
}

#[test]
fn well_formed_animation_passes() {
    let anim = Animation::new("ok", 1.0)
        .with_track(Track::bone(0, keys(&[0.0, 0.5, 1.0])))
        .with_track(Track::transform("tip", keys(&[0.0])));
    check(&anim).expect("valid");
}

#[test]
fn repeated_times_are_tolerated() {
    let anim = Animation::new("dup", 1.0).with_track(Track::bone(0, keys(&[0.0, 0.5, 0.5, 1.0])));
    check(&anim).expect("repeats are only logged");
}

#[test]
fn names_and_duration_are_checked() {
    assert!(matches!(check(&Animation::new("", 1.0)), Err(AnimationError::InvalidName(_))));
    assert!(matches!(
        check(&Animation::new(RETARGETED_POSE_NAME, 1.0)),
        Err(AnimationError::InvalidName(_))
    ));
    assert!(matches!(
        check(&Animation::new("neg", -0.1)),
        Err(AnimationError::InvalidAnimation { .. })
    ));
}

#[test]
fn track_targets_must_exist_and_be_unique() {
    let missing = Animation::new("m", 1.0).with_track(Track::bone(7, keys(&[0.0])));
    assert!(matches!(check(&missing), Err(AnimationError::InvalidAnimation { .. })));

    let unknown = Animation::new("u", 1.0).with_track(Track::transform("ghost", keys(&[0.0])));
    assert!(matches!(check(&unknown), Err(AnimationError::InvalidAnimation { .. })));

    // same bone addressed once by index and once by name
    let twice = Animation::new("t", 1.0)
        .with_track(Track::bone(1, keys(&[0.0])))
        .with_track(Track::transform("tip", keys(&[0.0])));
    assert!(matches!(check(&twice), Err(AnimationError::InvalidAnimation { .. })));
}

#[test]
fn keyframe_arrays_are_checked() {
    let bad = |kf: Keyframes| {
        let anim = Animation::new("k", 1.0).with_track(Track::bone(0, kf));
        matches!(check(&anim), Err(AnimationError::InvalidTrack { .. }))
    };

    assert!(bad(keys(&[])));
    assert!(bad(keys(&[0.1, 0.5])), "must start at 0");
    assert!(bad(keys(&[0.0, 0.6, 0.5])), "out of order");
    assert!(bad(keys(&[0.0, 1.5])), "past the duration");

    let mut short = keys(&[0.0, 0.5]);
    short.translations.pop();
    assert!(bad(short));

    let mut scales = keys(&[0.0, 0.5]);
    scales.scales = Some(vec![[1.0; 3]]);
    assert!(bad(scales));

    let mut skewed = keys(&[0.0, 0.5]);
    skewed.rotations[1] = [0.0, 0.0, 0.1, 1.0];
    assert!(bad(skewed));

    let mut nearly = keys(&[0.0, 0.5]);
    nearly.rotations[1] = [0.0, 0.0, 0.0, 1.00005];
    assert!(!bad(nearly), "within tolerance");
}

#[test]
fn skeleton_rules() {
    validate_skeleton(&two_bones()).expect("valid");

    let dup = Skeleton::new(vec![
        Bone::root("a", Transform::IDENTITY),
        Bone::root("a", Transform::IDENTITY),
    ]);
    assert!(matches!(validate_skeleton(&dup), Err(AnimationError::InvalidSkeleton(_))));

    let reserved = Skeleton::new(vec![Bone::root(NO_BONE_NAME, Transform::IDENTITY)]);
    assert!(validate_skeleton(&reserved).is_err());

    let empty_name = Skeleton::new(vec![Bone::root("", Transform::IDENTITY)]);
    assert!(validate_skeleton(&empty_name).is_err());

    let dangling = Skeleton::new(vec![Bone::child("a", 3, Transform::IDENTITY)]);
    assert!(validate_skeleton(&dangling).is_err());

    let cycle = Skeleton::new(vec![
        Bone::root("root", Transform::IDENTITY),
        Bone::child("a", 2, Transform::IDENTITY),
        Bone::child("b", 1, Transform::IDENTITY),
    ]);
    let err = validate_skeleton(&cycle).unwrap_err();
    assert!(err.to_string().contains("cycle"), "{err}");
}

#[test]
fn parsing_runs_validation() {
    let skeleton = parse_skeleton_json(
        r#"{ "bones": [ { "name": "root" }, { "name": "arm", "parent": 0 } ] }"#,
    )
    .expect("skeleton");
    assert_eq!(skeleton.bones[0].bind, Transform::IDENTITY);

    let rejected = parse_animation_json(
        r#"{ "name": "late", "duration": 1.0, "tracks": [
            { "kind": "transform", "target": "arm",
              "keyframes": { "times": [0.5], "translations": [[0,0,0]], "rotations": [[0,0,0,1]] } }
        ] }"#,
        &skeleton,
        &ValidationConfig::default(),
    );
    assert!(matches!(rejected, Err(AnimationError::InvalidTrack { .. })));

    let not_json = parse_skeleton_json("{ bones: }");
    assert!(matches!(not_json, Err(AnimationError::Json(_))));
}
