// crates/editor-relay-core/tests/request_model.rs
// ============================================================================
// Module: Request Model Tests
// Description: Tests for payload validation, status parsing, and wire forms.
// Purpose: Pin the per-kind payload contracts and the open-set status
//          vocabulary, including serialization stability.
// ============================================================================

//! ## Overview
//! Validates the required-field rules for every request kind, the
//! terminal/in-flight status classification, and the snake_case wire forms.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use editor_relay_core::AssetRefreshPayload;
use editor_relay_core::HierarchyRequestType;
use editor_relay_core::ImportOptions;
use editor_relay_core::MenuItemPayload;
use editor_relay_core::PayloadError;
use editor_relay_core::RefreshType;
use editor_relay_core::RequestKind;
use editor_relay_core::RequestPayload;
use editor_relay_core::RequestStatus;
use editor_relay_core::SceneHierarchyPayload;
use editor_relay_core::TestPlatform;
use editor_relay_core::TestRequestType;
use editor_relay_core::TestRunPayload;
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

fn test_run(request_type: TestRequestType, filter: Option<&str>) -> RequestPayload {
    RequestPayload::TestRun(TestRunPayload {
        request_type,
        test_filter: filter.map(str::to_string),
        test_platform: TestPlatform::EditMode,
    })
}

fn hierarchy(request_type: HierarchyRequestType, target: Option<&str>) -> RequestPayload {
    RequestPayload::SceneHierarchy(SceneHierarchyPayload {
        request_type,
        target_path: target.map(str::to_string),
        include_inactive: false,
        include_components: true,
    })
}

fn refresh(refresh_type: RefreshType, paths: &[&str]) -> RequestPayload {
    RequestPayload::AssetRefresh(AssetRefreshPayload {
        refresh_type,
        paths: paths.iter().map(|path| (*path).to_string()).collect(),
        import_options: ImportOptions::Default,
    })
}

// ============================================================================
// SECTION: Payload Validation Tests
// ============================================================================

#[test]
fn all_scope_test_run_needs_no_filter() {
    assert_eq!(test_run(TestRequestType::All, None).validate(), Ok(()));
}

#[test]
fn scoped_test_runs_require_a_filter() {
    for request_type in [TestRequestType::Class, TestRequestType::Method, TestRequestType::Category] {
        let error = test_run(request_type, None).validate().expect_err("filter required");
        assert!(matches!(error, PayloadError::MissingTestFilter { .. }));
        let error = test_run(request_type, Some("  ")).validate().expect_err("blank filter rejected");
        assert!(matches!(error, PayloadError::MissingTestFilter { .. }));
        assert_eq!(test_run(request_type, Some("MySuite.MyTest")).validate(), Ok(()));
    }
}

#[test]
fn menu_path_must_not_be_blank() {
    let blank = RequestPayload::MenuItem(MenuItemPayload {
        menu_path: " \t".to_string(),
    });
    assert_eq!(blank.validate(), Err(PayloadError::EmptyMenuPath));
    let valid = RequestPayload::MenuItem(MenuItemPayload {
        menu_path: "Window/General/Console".to_string(),
    });
    assert_eq!(valid.validate(), Ok(()));
}

#[test]
fn path_scoped_hierarchy_export_requires_target() {
    assert_eq!(hierarchy(HierarchyRequestType::Full, None).validate(), Ok(()));
    assert_eq!(
        hierarchy(HierarchyRequestType::Path, None).validate(),
        Err(PayloadError::MissingTargetPath)
    );
    assert_eq!(
        hierarchy(HierarchyRequestType::Path, Some("")).validate(),
        Err(PayloadError::MissingTargetPath)
    );
    assert_eq!(hierarchy(HierarchyRequestType::Path, Some("/Root/Player")).validate(), Ok(()));
}

#[test]
fn selective_refresh_requires_paths() {
    assert_eq!(refresh(RefreshType::Full, &[]).validate(), Ok(()));
    assert_eq!(refresh(RefreshType::Selective, &[]).validate(), Err(PayloadError::EmptyRefreshPaths));
    assert_eq!(refresh(RefreshType::Selective, &["Assets/Scripts"]).validate(), Ok(()));
}

// ============================================================================
// SECTION: Kind Mapping Tests
// ============================================================================

#[test]
fn kinds_map_to_stable_tables_and_labels() {
    let expected = [
        (RequestKind::TestRun, "test_run", "test_requests"),
        (RequestKind::MenuItem, "menu_item", "menu_item_requests"),
        (RequestKind::SceneHierarchy, "scene_hierarchy", "scene_hierarchy_requests"),
        (RequestKind::AssetRefresh, "asset_refresh", "asset_refresh_requests"),
    ];
    for (kind, label, table) in expected {
        assert_eq!(kind.as_str(), label);
        assert_eq!(kind.table_name(), table);
        assert_eq!(RequestKind::parse(label), Some(kind));
    }
    assert_eq!(RequestKind::parse("unknown"), None);
}

// ============================================================================
// SECTION: Status Tests
// ============================================================================

#[test]
fn terminal_statuses_are_classified() {
    for (label, status) in [
        ("completed", RequestStatus::Completed),
        ("failed", RequestStatus::Failed),
        ("cancelled", RequestStatus::Cancelled),
        ("timeout", RequestStatus::Timeout),
    ] {
        let parsed = RequestStatus::parse(label);
        assert_eq!(parsed, status);
        assert!(parsed.is_terminal());
        assert_eq!(parsed.as_label(), label);
    }
    assert!(!RequestStatus::parse("pending").is_terminal());
}

#[test]
fn unknown_labels_are_treated_as_in_flight() {
    for label in ["running", "processing", "executing", "finalizing", "importing_assets"] {
        let status = RequestStatus::parse(label);
        assert_eq!(status, RequestStatus::InFlight(label.to_string()));
        assert!(!status.is_terminal());
        assert_eq!(status.as_label(), label);
    }
}

proptest! {
    /// Any stored label survives a parse/format round trip unchanged.
    #[test]
    fn status_labels_round_trip(label in "[a-z_]{1,24}") {
        let status = RequestStatus::parse(&label);
        prop_assert_eq!(status.as_label(), label.as_str());
        prop_assert_eq!(
            status.is_terminal(),
            matches!(label.as_str(), "completed" | "failed" | "cancelled" | "timeout")
        );
    }
}

// ============================================================================
// SECTION: Wire Form Tests
// ============================================================================

#[test]
fn payloads_serialize_with_kind_tag() {
    let payload = refresh(RefreshType::Selective, &["Assets/Textures"]);
    let value = serde_json::to_value(&payload).expect("payload serializes");
    assert_eq!(
        value,
        json!({
            "kind": "asset_refresh",
            "refresh_type": "selective",
            "paths": ["Assets/Textures"],
            "import_options": "default",
        })
    );
    let back: RequestPayload = serde_json::from_value(value).expect("payload deserializes");
    assert_eq!(back, payload);
}

#[test]
fn statuses_serialize_as_plain_labels() {
    let status = RequestStatus::InFlight("running".to_string());
    let value = serde_json::to_value(&status).expect("status serializes");
    assert_eq!(value, json!("running"));
    let back: RequestStatus = serde_json::from_value(json!("cancelled")).expect("status deserializes");
    assert_eq!(back, RequestStatus::Cancelled);
}

#[test]
fn platform_labels_use_editor_casing() {
    assert_eq!(TestPlatform::EditMode.as_str(), "EditMode");
    assert_eq!(TestPlatform::parse("PlayMode"), Some(TestPlatform::PlayMode));
    assert_eq!(TestPlatform::parse("editmode"), None);
}
