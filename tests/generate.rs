//! End-to-end generation: file sets, determinism and output directory cleanup.

use std::fs;

use arsdkgen::{generate_source, GenConfig, GenError, Target};

const V1: &str = r#"
/// Settings common to every product.
feature common = 0 {
    multisetting camera_settings;

    /// Rename the drone.
    cmd set_name = 1 (name: string);

    /// Name changed.
    evt name_changed = 2 (name: string);
}

/// Legacy piloting feature.
feature ardrone3 = 1 {
    /// Piloting commands.
    class piloting = 0 {
        /// Take off.
        cmd take_off = 1 ();
    }

    /// Piloting state.
    class piloting_state = 4 {
        enum flying_state { landed; flying; }

        /// Flying state changed.
        evt flying_state_changed = 1 (state: enum flying_state);
    }
}

/// Camera.
feature camera = 134 {
    enum mode { photo; recording; }

    /// Apply settings.
    cmd configure = 1 (modes: bitfield<u8> mode, cfg: multisetting camera_settings);
}
"#;

const V2: &str = r#"
/// Settings common to every product.
feature common = 0 {
    /// Rename the drone.
    cmd set_name = 1 (name: string);
}
"#;

#[test]
fn generation_is_deterministic() {
    let config = GenConfig::default();
    let a = generate_source(V1, &config, Target::All).expect("generate");
    let b = generate_source(V1, &config, Target::All).expect("generate");
    assert_eq!(a, b);
    let names: Vec<&str> = a.names().collect();
    assert_eq!(
        names,
        vec![
            "arsdk_feature_ardrone3_piloting.rs",
            "arsdk_feature_ardrone3_piloting_impl.rs",
            "arsdk_feature_ardrone3_piloting_state.rs",
            "arsdk_feature_ardrone3_piloting_state_impl.rs",
            "arsdk_feature_camera.rs",
            "arsdk_feature_camera_impl.rs",
            "arsdk_feature_common.rs",
            "arsdk_feature_common_impl.rs",
            "arsdk_features.rs",
            "arsdk_features_uids.rs",
            "cmd_encoder.rs",
            "expected_cmd.rs",
        ]
    );
}

#[test]
fn aggregate_declares_units_and_multisettings() {
    let set = generate_source(V1, &GenConfig::default(), Target::Bindings).expect("generate");
    let aggregate = set.get("arsdk_features.rs").expect("aggregate");
    assert!(aggregate.contains("#[path = \"arsdk_feature_ardrone3_piloting_state.rs\"]\npub mod arsdk_feature_ardrone3_piloting_state;"));
    assert!(aggregate.contains("pub use uids::FEATURE_UIDS;"));
    assert!(aggregate.contains("pub struct ArsdkFeatureCommonCameraSettings {"));

    let uids = set.get("arsdk_features_uids.rs").expect("uids");
    let piloting = uids.find("\"ardrone3_piloting\"").expect("piloting");
    let state = uids.find("\"ardrone3_piloting_state\"").expect("state");
    let camera = uids.find("\"camera\"").expect("camera");
    assert!(piloting < state && state < camera);
    assert!(uids.contains("(arsdk_feature_ardrone3_piloting_state::ARSDK_FEATURE_ARDRONE3_PILOTING_STATE_UID, \"ardrone3_piloting_state\"),"));

    let state_unit = set.get("arsdk_feature_ardrone3_piloting_state.rs").expect("state unit");
    assert!(state_unit.contains("pub const ARSDK_FEATURE_ARDRONE3_PILOTING_STATE_UID: u16 = 0x0104;"));

    let camera_unit = set.get("arsdk_feature_camera.rs").expect("camera unit");
    assert!(camera_unit.contains("use super::ArsdkFeatureCommonCameraSettings;"));
    assert!(camera_unit.contains("pub type ArsdkFeatureCameraModeBitFieldRepr = u32;"));
}

#[test]
fn custom_paths_reach_generated_code() {
    let config = GenConfig::default()
        .with_prefix("Sdk")
        .with_codec_path("crate::wire")
        .with_bindings_path("crate::gen");
    let set = generate_source(V2, &config, Target::All).expect("generate");
    let unit = set.get("sdk_common_impl.rs").expect("unit");
    assert!(unit.contains("pub fn setNameEncoder(name: String) -> impl Fn(&mut crate::wire::Cmd) -> i32 {"));
    let expected = set.get("expected_cmd.rs").expect("harness");
    assert!(expected.contains("crate::gen::sdk_common::SdkCommon::setNameEncoder(name)(&mut wire_cmd);"));
    assert!(set.get("sdk_features.rs").is_some());
}

#[test]
fn regeneration_removes_stale_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = GenConfig::default();
    fs::write(dir.path().join("mod.rs"), "pub mod arsdk_features;\n").expect("write");

    generate_source(V1, &config, Target::All)
        .expect("generate")
        .write_to(dir.path())
        .expect("write v1");
    assert!(dir.path().join("arsdk_feature_camera.rs").exists());

    let written = generate_source(V2, &config, Target::All)
        .expect("generate")
        .write_to(dir.path())
        .expect("write v2");
    assert_eq!(written.len(), 6);
    assert!(!dir.path().join("arsdk_feature_camera.rs").exists());
    assert!(!dir.path().join("arsdk_feature_ardrone3_piloting_state_impl.rs").exists());
    assert!(dir.path().join("arsdk_feature_common.rs").exists());
    assert!(dir.path().join("mod.rs").exists());

    let on_disk = fs::read_to_string(dir.path().join("arsdk_feature_common_impl.rs")).expect("read");
    let again = generate_source(V2, &config, Target::All).expect("generate");
    assert_eq!(Some(on_disk.as_str()), again.get("arsdk_feature_common_impl.rs"));
}

#[test]
fn colliding_identifiers_block_generation() {
    let params = "feature a = 1 { /// C.\n cmd c = 1 (cam_id: u8, cam__id: u8); }";
    let err = generate_source(params, &GenConfig::default(), Target::All).unwrap_err();
    assert!(matches!(err, GenError::Lint { count: 1, ref path, .. } if path == "a.c.cam__id"));

    let harness = r#"
        feature a_b = 1 { /// C.
            cmd c = 1 (); }
        feature a = 2 { /// B c.
            cmd b_c = 1 (); }
    "#;
    let err = generate_source(harness, &GenConfig::default(), Target::Harness).unwrap_err();
    assert!(matches!(err, GenError::Lint { count: 2, .. }));
}

#[test]
fn schema_errors_surface() {
    let err = generate_source("feature broken = {", &GenConfig::default(), Target::All).unwrap_err();
    assert!(matches!(err, GenError::Schema(_)));
}
