//! Integration tests for catalog files as deployed through `CATALOG_PATH`.

use domain::{BranchKey, CatalogError, CatalogFile, OrderStatus};

const CATALOG: &str = r#"{
    "services": [
        {
            "key": "background",
            "label": "Background check",
            "sub_services": [
                { "key": "basic", "label": "Basic" },
                { "key": "extended", "label": "Extended" }
            ]
        },
        { "key": "audit", "label": "Company audit" }
    ],
    "questions": {
        "basic": [
            { "key": "subject", "text": "Who should we look into?" },
            { "key": "contact", "text": "How can we reach you?" }
        ],
        "extended": [
            { "key": "subject", "text": "Who should we look into?" },
            { "key": "history", "text": "What do you already know?" },
            { "key": "contact", "text": "How can we reach you?" }
        ],
        "audit": [
            { "key": "company", "text": "Which company?" }
        ]
    },
    "statuses": [
        { "key": "new", "label": "Received" },
        { "key": "working", "label": "Working on it" },
        { "key": "done", "label": "Done" }
    ]
}"#;

#[test]
fn deployed_catalog_loads() {
    let (services, statuses) = CatalogFile::from_json(CATALOG)
        .unwrap()
        .into_catalogs()
        .unwrap();

    assert_eq!(
        services.branches(),
        vec![
            BranchKey::sub_service("background", "basic"),
            BranchKey::sub_service("background", "extended"),
            BranchKey::service("audit"),
        ]
    );
    let extended = services
        .questions(&BranchKey::sub_service("background", "extended"))
        .unwrap();
    let keys: Vec<&str> = extended.iter().map(|q| q.key.as_str()).collect();
    assert_eq!(keys, vec!["subject", "history", "contact"]);

    assert_eq!(statuses.initial(), OrderStatus::new("new"));
    assert_eq!(statuses.label(&OrderStatus::new("working")), "Working on it");
    assert!(!statuses.contains("completed"));
}

#[test]
fn statuses_default_when_omitted() {
    let json = r#"{
        "services": [{ "key": "other", "label": "Other" }],
        "questions": { "other": [{ "key": "task", "text": "Describe it" }] }
    }"#;
    let (_, statuses) = CatalogFile::from_json(json).unwrap().into_catalogs().unwrap();
    assert!(statuses.contains("in_progress"));
    assert!(statuses.contains("completed"));
}

#[test]
fn status_set_without_initial_status_is_rejected() {
    let json = r#"{
        "services": [{ "key": "other", "label": "Other" }],
        "questions": { "other": [{ "key": "task", "text": "Describe it" }] },
        "statuses": [{ "key": "open", "label": "Open" }]
    }"#;
    let err = CatalogFile::from_json(json).unwrap().into_catalogs().unwrap_err();
    assert!(matches!(err, CatalogError::MissingInitialStatus(_)));
}

#[test]
fn reachable_branch_without_questions_is_rejected() {
    let json = r#"{
        "services": [
            { "key": "a", "label": "A", "sub_services": [{ "key": "a1", "label": "A1" }] },
            { "key": "b", "label": "B" }
        ],
        "questions": { "b": [{ "key": "q", "text": "?" }] }
    }"#;
    let err = CatalogFile::from_json(json).unwrap().into_catalogs().unwrap_err();
    assert!(matches!(err, CatalogError::MissingQuestions(_)));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = CatalogFile::from_json("{ \"services\": [").unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}
