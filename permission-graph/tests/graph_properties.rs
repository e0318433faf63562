//! Integration tests for the permission graph query surface.
//!
//! These tests build graphs from realistic configurations and check the
//! algebraic properties of the closed graph:
//! 1. Reflexivity of `who_grants`
//! 2. Transitivity of `what_grants`
//! 3. Cycle rejection
//! 4. Module, resource and wildcard cascades
//! 5. Custom action hierarchies
//! 6. Role composition and inheritance

use permission_graph::{
    ActionHierarchy, GraphConfig, GraphError, NoopObserver, PermissionGraph, RoleDefinition,
};

/// The two-module layout used throughout.
fn sample_config() -> GraphConfig {
    GraphConfig::new()
        .module("users", ["profile", "settings"])
        .module("posts", ["content", "comments"])
}

fn build(config: &GraphConfig) -> PermissionGraph {
    PermissionGraph::build_with_observer(config, &NoopObserver).unwrap()
}

fn build_err(config: &GraphConfig) -> GraphError {
    PermissionGraph::build_with_observer(config, &NoopObserver).unwrap_err()
}

/// Configuration exercising roles, nested roles and inheritance.
fn role_config() -> GraphConfig {
    sample_config()
        .role(RoleDefinition::new("viewer", "Viewer").grant("*:read"))
        .role(
            RoleDefinition::new("author", "Author")
                .grant("posts.content:create")
                .grant("role:viewer"),
        )
        .role(
            RoleDefinition::new("moderator", "Moderator")
                .grant("posts.comments:delete")
                .inherits("viewer"),
        )
        .role(
            RoleDefinition::new("admin", "Administrator")
                .grant("users:*")
                .inherits("author")
                .inherits("moderator")
                .describe("Everything except deleting posts"),
        )
}

// =============================================================================
// Basic checks
// =============================================================================

#[test]
fn test_action_hierarchy_checks() {
    let graph = build(&sample_config());

    assert!(graph.has_permission(["users:update"], "users:read"));
    assert!(!graph.has_permission(["users:create"], "users:update"));
    assert!(!graph.has_permission(["users:read"], "posts:read"));
    assert!(graph.has_permission(["*:delete"], "posts:delete"));
    assert!(graph.has_permission(["users:read"], "users.profile:read"));
}

#[test]
fn test_global_wildcard_reaches_resources() {
    let graph = build(&sample_config());

    assert!(graph.has_permission(["*:update"], "posts.comments:update"));
    assert!(graph.has_permission(["*:update"], "users.settings:read"));
    assert!(!graph.has_permission(["*:read"], "posts.comments:create"));
}

#[test]
fn test_resource_does_not_imply_module() {
    let graph = build(&sample_config());

    assert!(!graph.has_permission(["users.profile:delete"], "users:delete"));
    assert!(!graph.has_permission(["users.profile:delete"], "users.settings:read"));
    assert!(graph.has_permission(["users.profile:delete"], "users.profile:read"));
}

#[test]
fn test_any_held_permission_suffices() {
    let graph = build(&sample_config());

    assert!(graph.has_permission(["posts:read", "users:create"], "users.profile:read"));
    assert!(!graph.has_permission(["posts:read", "users:create"], "users:update"));
}

// =============================================================================
// Closure properties
// =============================================================================

#[test]
fn test_who_grants_is_reflexive() {
    let graph = build(&role_config());

    for permission in graph.permissions() {
        assert!(
            graph.who_grants(permission).contains(permission),
            "{} should grant itself",
            permission
        );
    }
}

#[test]
fn test_what_grants_is_transitive() {
    let graph = build(&role_config());

    for p in graph.permissions() {
        let direct = graph.what_grants(p);
        for q in &direct {
            for r in graph.what_grants(q) {
                assert!(direct.contains(&r), "{} -> {} -> {} not closed", p, q, r);
            }
        }
    }
}

#[test]
fn test_forward_and_reverse_agree() {
    let graph = build(&role_config());

    for p in graph.permissions() {
        for q in graph.what_grants(p) {
            assert!(graph.who_grants(&q).contains(p));
        }
    }
}

#[test]
fn test_stats_match_config() {
    let config = role_config();
    let graph = build(&config);
    let stats = graph.stats();

    assert_eq!(stats.modules, config.modules.len());
    assert_eq!(
        stats.resources,
        config.modules.values().map(|r| r.len()).sum::<usize>()
    );
    assert_eq!(stats.actions, 4);
    assert_eq!(stats.roles, 4);
    assert_eq!(stats.permissions, graph.permissions().count());
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn test_mutual_inheritance_is_rejected() {
    let config = sample_config()
        .role(RoleDefinition::new("a", "A").inherits("b"))
        .role(RoleDefinition::new("b", "B").inherits("a"));

    match build_err(&config) {
        GraphError::CircularDependency { node, path } => {
            assert!(node == "role:a" || node == "role:b");
            assert_eq!(path.first(), path.last());
            assert!(path.contains(&"role:a".to_string()));
            assert!(path.contains(&"role:b".to_string()));
        }
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_nested_role_cycle_is_rejected() {
    let config = sample_config()
        .role(RoleDefinition::new("a", "A").grant("role:b"))
        .role(RoleDefinition::new("b", "B").grant("role:c"))
        .role(RoleDefinition::new("c", "C").grant("users:read").inherits("a"));

    assert!(matches!(
        build_err(&config),
        GraphError::CircularDependency { .. }
    ));
}

#[test]
fn test_self_grant_is_rejected() {
    let config = sample_config().role(RoleDefinition::new("loop", "Loop").grant("role:loop"));

    match build_err(&config) {
        GraphError::CircularDependency { node, path } => {
            assert_eq!(node, "role:loop");
            assert_eq!(path, vec!["role:loop", "role:loop"]);
        }
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_unknown_permission_in_role() {
    let config = sample_config().role(RoleDefinition::new("viewer", "Viewer").grant("billing:read"));

    match build_err(&config) {
        GraphError::UnknownPermission { role, permission } => {
            assert_eq!(role, "viewer");
            assert_eq!(permission, "billing:read");
        }
        other => panic!("Expected UnknownPermission, got {:?}", other),
    }
}

#[test]
fn test_unknown_role_reference_in_role() {
    let config = sample_config().role(RoleDefinition::new("viewer", "Viewer").grant("role:ghost"));

    let err = build_err(&config);
    assert!(err.is_role_reference());
    assert_eq!(err.error_code(), "UNKNOWN_ROLE_REFERENCE");
}

#[test]
fn test_unknown_parent_role() {
    let config = sample_config().role(RoleDefinition::new("viewer", "Viewer").inherits("ghost"));

    let err = build_err(&config);
    assert!(err.is_role_reference());
    assert_eq!(err.error_code(), "UNKNOWN_PARENT_ROLE");
}

#[test]
fn test_validation_runs_before_cycle_detection() {
    // Both a cycle and an unknown grant: the unknown grant wins.
    let config = sample_config()
        .role(RoleDefinition::new("a", "A").inherits("b").grant("users:fly"))
        .role(RoleDefinition::new("b", "B").inherits("a"));

    assert!(matches!(
        build_err(&config),
        GraphError::UnknownPermission { .. }
    ));
}

// =============================================================================
// Roles
// =============================================================================

#[test]
fn test_role_composition() {
    let graph = build(&role_config());

    // Nested role grant: author -> role:viewer -> *:read
    assert!(graph.has_permission(["author"], "users.settings:read"));
    assert!(graph.has_permission(["author"], "posts.content:create"));
    assert!(!graph.has_permission(["author"], "posts.comments:create"));

    // Inheritance: moderator -> viewer
    assert!(graph.has_permission(["role:moderator"], "posts:read"));
    assert!(graph.has_permission(["role:moderator"], "posts.comments:update"));

    // Multiple parents
    assert!(graph.has_permission(["admin"], "posts.comments:delete"));
    assert!(graph.has_permission(["admin"], "posts.content:create"));
    assert!(graph.has_permission(["admin"], "users.profile:delete"));
    assert!(graph.has_permission(["admin"], "role:viewer"));
    assert!(!graph.has_permission(["admin"], "posts:delete"));
}

#[test]
fn test_bare_role_ids_only_qualify_declared_roles() {
    let graph = build(&role_config());

    assert!(graph.has_permission(["viewer"], "users:read"));
    assert!(!graph.has_permission(["ghost"], "users:read"));
}

#[test]
fn test_who_grants_includes_roles() {
    let graph = build(&role_config());
    let granters = graph.who_grants("posts.comments:delete");

    for expected in [
        "posts.comments:delete",
        "posts.comments:*",
        "posts:delete",
        "posts:*",
        "*:delete",
        "role:moderator",
        "role:admin",
    ] {
        assert!(granters.contains(expected), "missing {}", expected);
    }
    assert!(!granters.contains("role:viewer"));
    assert!(!granters.contains("role:author"));
}

#[test]
fn test_effective_permissions_of_role() {
    let graph = build(&role_config());
    let effective = graph.effective_permissions(["moderator"]);

    assert!(effective.contains("role:moderator"));
    assert!(effective.contains("role:viewer"));
    assert!(effective.contains("posts.comments:delete"));
    assert!(effective.contains("users.profile:read"));
    assert!(!effective.contains("users:update"));
}

// =============================================================================
// Custom hierarchies
// =============================================================================

fn approval_hierarchy() -> ActionHierarchy {
    ActionHierarchy::from_pairs([
        ("delete", vec!["update", "approve"]),
        ("approve", vec!["update"]),
        ("update", vec!["create", "read"]),
    ])
}

#[test]
fn test_approval_hierarchy() {
    let config = GraphConfig::new()
        .module("scope", ["item"])
        .hierarchy(approval_hierarchy());
    let graph = build(&config);

    assert!(graph.has_permission(["scope:approve"], "scope:update"));
    assert!(graph.has_permission(["scope:approve"], "scope:read"));
    assert!(graph.has_permission(["scope:delete"], "scope:approve"));
    assert!(!graph.has_permission(["scope:update"], "scope:approve"));
    assert!(graph.has_permission(["*:approve"], "scope.item:create"));
    assert_eq!(graph.stats().actions, 5);
}

#[test]
fn test_hierarchy_from_json_config() {
    let config = GraphConfig::from_json_str(
        r#"{
            "modules": {"scope": []},
            "roles": {
                "approver": {"id": "approver", "name": "Approver", "permissions": ["scope:approve"]}
            },
            "hierarchy": {
                "delete": ["update", "approve"],
                "approve": ["update"],
                "update": ["create", "read"]
            }
        }"#,
    )
    .unwrap();
    let graph = build(&config);

    assert!(graph.has_permission(["approver"], "scope:read"));
    assert!(!graph.has_permission(["approver"], "scope:delete"));
}

#[test]
fn test_implied_only_actions_are_leaves() {
    let config = GraphConfig::new()
        .module("scope", Vec::<String>::new())
        .hierarchy(approval_hierarchy());
    let graph = build(&config);

    assert!(graph.contains("scope:create"));
    assert!(graph.contains("*:read"));
    assert!(graph.what_grants("scope:read").is_empty());
    assert!(!graph.has_permission(["scope:create"], "scope:read"));
    assert!(graph.has_permission(["scope:*"], "scope:read"));
    assert_eq!(graph.stats().actions, 5);
}

#[test]
fn test_malformed_implied_action_is_rejected() {
    let config = sample_config().hierarchy(ActionHierarchy::from_pairs([("delete", vec!["pu:rge"])]));

    assert!(matches!(
        build_err(&config),
        GraphError::InvalidName { kind: "action", .. }
    ));
}

// =============================================================================
// Introspection
// =============================================================================

#[test]
fn test_visualize_lists_every_source() {
    let graph = build(&role_config());
    let dump = graph.visualize();

    assert!(dump.lines().any(|l| l.starts_with("role:viewer -> ")));
    assert!(!dump.lines().any(|l| l.starts_with("users.profile:read ")));

    let sources: Vec<&str> = dump.lines().map(|l| l.split(" -> ").next().unwrap()).collect();
    let mut sorted = sources.clone();
    sorted.sort_unstable();
    assert_eq!(sources, sorted);
}

#[test]
fn test_accessors_resolve_to_catalog() {
    let graph = build(&role_config());
    let accessors = graph.accessors();

    let permission = accessors.get("posts_comments_delete").unwrap();
    assert!(graph.has_permission(["moderator"], permission));
    assert_eq!(accessors.get("role_admin"), Ok("role:admin"));
    assert!(accessors.get("posts_comments_fly").is_err());
}

// =============================================================================
// Observability
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_build_with_tracing_observer() {
    init_tracing();

    let graph = PermissionGraph::build(&role_config()).unwrap();
    assert_eq!(graph.stats().roles, 4);

    let broken = sample_config().role(RoleDefinition::new("viewer", "Viewer").grant("users:fly"));
    assert!(PermissionGraph::build(&broken).is_err());
}
