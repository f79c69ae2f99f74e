//! Integration tests for the GraphQL API
//!
//! These tests execute real operations against the full schema backed by the
//! in-memory store:
//! - Signup/login and the bearer-token flow
//! - Authenticated link mutations (create/update/delete)
//! - Voting and its failure modes
//! - Listing with filter, multi-key ordering, and pagination
//! - The LinkFeed aggregate and its deterministic id

use async_graphql::{Request, Response};
use serde_json::Value;

use linkboard::db::{Database, NewLink};
use linkboard::graphql::{AuthUser, LinkboardSchema, build_schema};
use linkboard::services::{AuthConfig, AuthService};

// ============================================================================
// Harness
// ============================================================================

/// Schema wired to a fresh in-memory store. Low bcrypt cost keeps the
/// signup-heavy tests fast.
fn test_api() -> (LinkboardSchema, AuthService, Database) {
    let db = Database::in_memory();
    let auth = AuthService::new(
        db.clone(),
        AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        },
    );
    let schema = build_schema(db.clone(), auth.clone());
    (schema, auth, db)
}

/// Execute a query with no caller identity
async fn exec(schema: &LinkboardSchema, query: &str) -> Response {
    schema.execute(query).await
}

/// Execute a query as an authenticated user
async fn exec_as(schema: &LinkboardSchema, query: &str, user: AuthUser) -> Response {
    schema.execute(Request::new(query).data(user)).await
}

/// Unwrap a successful response into its JSON data
fn data(response: Response) -> Value {
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().expect("data is JSON")
}

/// Machine-readable code from the first error, if any
fn error_code(response: &Response) -> Option<String> {
    let error = response.errors.first()?;
    let value = serde_json::to_value(error).ok()?;
    value["extensions"]["code"].as_str().map(str::to_string)
}

/// Sign up a user and hand back the identity for authenticated requests
async fn signup(schema: &LinkboardSchema, email: &str, name: &str) -> AuthUser {
    let query = format!(
        r#"mutation {{ signup(email: "{email}", name: "{name}", password: "s3cret") {{ user {{ id }} }} }}"#
    );
    let value = data(exec(schema, &query).await);
    let user_id = value["signup"]["user"]["id"].as_i64().expect("user id");
    AuthUser { user_id }
}

/// Post a link as the given user and return its id
async fn post_link(schema: &LinkboardSchema, user: AuthUser, description: &str, url: &str) -> i64 {
    let query = format!(
        r#"mutation {{ createLink(description: "{description}", url: "{url}") {{ id }} }}"#
    );
    let value = data(exec_as(schema, &query, user).await);
    value["createLink"]["id"].as_i64().expect("link id")
}

// ============================================================================
// Signup / Login
// ============================================================================

mod auth_flow {
    use super::*;

    #[tokio::test]
    async fn test_signup_returns_token_and_user() {
        let (schema, _, _) = test_api();

        let response = exec(
            &schema,
            r#"mutation {
                signup(email: "alice@example.com", name: "Alice", password: "s3cret") {
                    token
                    user { id name email }
                }
            }"#,
        )
        .await;

        let value = data(response);
        assert!(!value["signup"]["token"].as_str().unwrap().is_empty());
        assert_eq!(value["signup"]["user"]["id"], 1);
        assert_eq!(value["signup"]["user"]["name"], "Alice");
        assert_eq!(value["signup"]["user"]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (schema, _, _) = test_api();
        signup(&schema, "alice@example.com", "Alice").await;

        let response = exec(
            &schema,
            r#"mutation { signup(email: "alice@example.com", name: "Imposter", password: "other") { token } }"#,
        )
        .await;

        assert_eq!(error_code(&response).as_deref(), Some("DUPLICATE_EMAIL"));
        assert_eq!(response.errors[0].message, "Email is already registered");
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let (schema, _, _) = test_api();
        let user = signup(&schema, "alice@example.com", "Alice").await;

        let response = exec(
            &schema,
            r#"mutation { login(email: "alice@example.com", password: "s3cret") { token user { id } } }"#,
        )
        .await;

        let value = data(response);
        assert!(!value["login"]["token"].as_str().unwrap().is_empty());
        assert_eq!(value["login"]["user"]["id"], user.user_id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (schema, _, _) = test_api();
        signup(&schema, "alice@example.com", "Alice").await;

        // Wrong password and unknown email produce the same error
        let wrong_password = exec(
            &schema,
            r#"mutation { login(email: "alice@example.com", password: "nope") { token } }"#,
        )
        .await;
        let unknown_email = exec(
            &schema,
            r#"mutation { login(email: "nobody@example.com", password: "s3cret") { token } }"#,
        )
        .await;

        for response in [&wrong_password, &unknown_email] {
            assert_eq!(error_code(response).as_deref(), Some("INVALID_CREDENTIALS"));
            assert_eq!(response.errors[0].message, "Incorrect email or password");
        }
    }

    #[tokio::test]
    async fn test_bearer_token_authenticates_requests() {
        let (schema, auth, _) = test_api();

        let value = data(
            exec(
                &schema,
                r#"mutation { signup(email: "alice@example.com", name: "Alice", password: "s3cret") { token } }"#,
            )
            .await,
        );
        let token = value["signup"]["token"].as_str().unwrap().to_string();

        // The HTTP layer turns the Authorization header into request data
        let user = auth
            .decode_auth_header(&format!("Bearer {token}"))
            .expect("fresh token decodes");

        let link_id = post_link(&schema, user, "posted with a token", "https://example.com").await;
        assert_eq!(link_id, 1);
    }
}

// ============================================================================
// Link Mutations
// ============================================================================

mod link_mutations {
    use super::*;

    #[tokio::test]
    async fn test_mutations_require_a_caller_identity() {
        let (schema, _, _) = test_api();

        let gated = [
            r#"mutation { createLink(description: "d", url: "https://example.com") { id } }"#,
            r#"mutation { updateLink(id: 1, url: "https://example.com") { id } }"#,
            r#"mutation { deleteLink(id: 1) { id } }"#,
            r#"mutation { vote(linkId: 1) { user { id } } }"#,
        ];

        for query in gated {
            let response = exec(&schema, query).await;
            assert_eq!(
                error_code(&response).as_deref(),
                Some("UNAUTHENTICATED"),
                "expected auth failure for {query}"
            );
        }

        // None of the rejected calls reached the store
        let value = data(exec(&schema, r#"query { fetchAllLinks { id } }"#).await);
        assert_eq!(value["fetchAllLinks"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_create_link_sets_the_author() {
        let (schema, _, _) = test_api();
        let user = signup(&schema, "alice@example.com", "Alice").await;

        let response = exec_as(
            &schema,
            r#"mutation {
                createLink(description: "rust book", url: "https://doc.rust-lang.org") {
                    id
                    description
                    url
                    createdAt
                    postedBy { id email }
                }
            }"#,
            user,
        )
        .await;

        let value = data(response);
        let link = &value["createLink"];
        assert_eq!(link["id"], 1);
        assert_eq!(link["description"], "rust book");
        assert_eq!(link["url"], "https://doc.rust-lang.org");
        assert!(link["createdAt"].is_string());
        assert_eq!(link["postedBy"]["id"], user.user_id);
        assert_eq!(link["postedBy"]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn test_update_link_changes_only_supplied_fields() {
        let (schema, _, _) = test_api();
        let user = signup(&schema, "alice@example.com", "Alice").await;
        let link_id = post_link(&schema, user, "original", "https://old.example").await;

        let query = format!(
            r#"mutation {{ updateLink(id: {link_id}, url: "https://new.example") {{ description url }} }}"#
        );
        let value = data(exec_as(&schema, &query, user).await);
        assert_eq!(value["updateLink"]["description"], "original");
        assert_eq!(value["updateLink"]["url"], "https://new.example");

        // No fields supplied still succeeds and returns the stored row
        let query = format!(r#"mutation {{ updateLink(id: {link_id}) {{ description url }} }}"#);
        let value = data(exec_as(&schema, &query, user).await);
        assert_eq!(value["updateLink"]["description"], "original");
        assert_eq!(value["updateLink"]["url"], "https://new.example");
    }

    #[tokio::test]
    async fn test_update_to_an_empty_string_is_stored() {
        let (schema, _, _) = test_api();
        let user = signup(&schema, "alice@example.com", "Alice").await;
        let link_id = post_link(&schema, user, "original", "https://example.com").await;

        // An explicit empty string is a supplied value, not an omission
        let query =
            format!(r#"mutation {{ updateLink(id: {link_id}, description: "") {{ description url }} }}"#);
        let value = data(exec_as(&schema, &query, user).await);
        assert_eq!(value["updateLink"]["description"], "");
        assert_eq!(value["updateLink"]["url"], "https://example.com");
    }

    #[tokio::test]
    async fn test_update_missing_link_is_not_found() {
        let (schema, _, _) = test_api();
        let user = signup(&schema, "alice@example.com", "Alice").await;

        let response = exec_as(
            &schema,
            r#"mutation { updateLink(id: 42, description: "ghost") { id } }"#,
            user,
        )
        .await;

        assert_eq!(error_code(&response).as_deref(), Some("NOT_FOUND"));
        assert_eq!(response.errors[0].message, "Link 42 not found");
    }

    #[tokio::test]
    async fn test_delete_link_returns_the_removed_entity() {
        let (schema, _, _) = test_api();
        let user = signup(&schema, "alice@example.com", "Alice").await;
        let link_id = post_link(&schema, user, "doomed", "https://example.com").await;

        let query = format!(r#"mutation {{ deleteLink(id: {link_id}) {{ id description }} }}"#);
        let value = data(exec_as(&schema, &query, user).await);
        assert_eq!(value["deleteLink"]["id"], link_id);
        assert_eq!(value["deleteLink"]["description"], "doomed");

        // The link is gone afterwards
        let query = format!(r#"query {{ fetchSingleLink(id: {link_id}) {{ id }} }}"#);
        let value = data(exec(&schema, &query).await);
        assert!(value["fetchSingleLink"].is_null());
    }

    #[tokio::test]
    async fn test_delete_missing_link_is_not_found() {
        let (schema, _, _) = test_api();
        let user = signup(&schema, "alice@example.com", "Alice").await;

        let response = exec_as(&schema, r#"mutation { deleteLink(id: 7) { id } }"#, user).await;

        assert_eq!(error_code(&response).as_deref(), Some("NOT_FOUND"));
    }
}

// ============================================================================
// Voting
// ============================================================================

mod voting {
    use super::*;

    #[tokio::test]
    async fn test_vote_returns_link_and_voter() {
        let (schema, _, _) = test_api();
        let alice = signup(&schema, "alice@example.com", "Alice").await;
        let bob = signup(&schema, "bob@example.com", "Bob").await;
        let link_id = post_link(&schema, alice, "worth a vote", "https://example.com").await;

        let query = format!(
            r#"mutation {{ vote(linkId: {link_id}) {{ link {{ id }} user {{ id name }} }} }}"#
        );
        let value = data(exec_as(&schema, &query, bob).await);
        assert_eq!(value["vote"]["link"]["id"], link_id);
        assert_eq!(value["vote"]["user"]["id"], bob.user_id);
        assert_eq!(value["vote"]["user"]["name"], "Bob");
    }

    #[tokio::test]
    async fn test_double_vote_is_rejected() {
        let (schema, _, _) = test_api();
        let alice = signup(&schema, "alice@example.com", "Alice").await;
        let link_id = post_link(&schema, alice, "tempting", "https://example.com").await;

        let query = format!(r#"mutation {{ vote(linkId: {link_id}) {{ link {{ id }} }} }}"#);
        data(exec_as(&schema, &query, alice).await);

        let response = exec_as(&schema, &query, alice).await;
        assert_eq!(error_code(&response).as_deref(), Some("DUPLICATE_VOTE"));

        // The failed retry must not have touched the voter set.
        let query = format!(r#"query {{ fetchSingleLink(id: {link_id}) {{ voters {{ id }} }} }}"#);
        let value = data(exec(&schema, &query).await);
        assert_eq!(value["fetchSingleLink"]["voters"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_vote_on_missing_link_fails() {
        let (schema, _, _) = test_api();
        let user = signup(&schema, "alice@example.com", "Alice").await;

        let response = exec_as(
            &schema,
            r#"mutation { vote(linkId: 999) { link { id } } }"#,
            user,
        )
        .await;

        assert_eq!(error_code(&response).as_deref(), Some("LINK_NOT_FOUND"));
        assert_eq!(
            response.errors[0].message,
            "Unable to vote for link 999. Does it exist?"
        );
    }

    #[tokio::test]
    async fn test_votes_surface_on_both_sides_of_the_relation() {
        let (schema, _, _) = test_api();
        let alice = signup(&schema, "alice@example.com", "Alice").await;
        let bob = signup(&schema, "bob@example.com", "Bob").await;
        let link_id = post_link(&schema, alice, "popular", "https://example.com").await;

        let query = format!(r#"mutation {{ vote(linkId: {link_id}) {{ link {{ id }} }} }}"#);
        data(exec_as(&schema, &query, bob).await);

        // Link side: voters; user side: voted links
        let query = format!(
            r#"query {{ fetchSingleLink(id: {link_id}) {{ voters {{ email votes {{ id }} }} }} }}"#
        );
        let value = data(exec(&schema, &query).await);
        let voters = value["fetchSingleLink"]["voters"].as_array().unwrap();
        assert_eq!(voters.len(), 1);
        assert_eq!(voters[0]["email"], "bob@example.com");
        assert_eq!(voters[0]["votes"][0]["id"], link_id);
    }

    #[tokio::test]
    async fn test_user_links_and_votes_are_separate_relations() {
        let (schema, _, _) = test_api();
        let alice = signup(&schema, "alice@example.com", "Alice").await;
        let bob = signup(&schema, "bob@example.com", "Bob").await;
        let first = post_link(&schema, alice, "first", "https://example.com/1").await;
        let second = post_link(&schema, alice, "second", "https://example.com/2").await;

        let query = format!(r#"mutation {{ vote(linkId: {first}) {{ link {{ id }} }} }}"#);
        data(exec_as(&schema, &query, bob).await);

        // Author side carries authored links and no votes; the voter side is
        // the mirror image.
        let query = format!(
            r#"query {{ fetchSingleLink(id: {first}) {{
                postedBy {{ links {{ id }} votes {{ id }} }}
                voters {{ links {{ id }} votes {{ id }} }}
            }} }}"#
        );
        let value = data(exec(&schema, &query).await);

        let author = &value["fetchSingleLink"]["postedBy"];
        assert_eq!(author["links"][0]["id"], first);
        assert_eq!(author["links"][1]["id"], second);
        assert_eq!(author["links"].as_array().unwrap().len(), 2);
        assert_eq!(author["votes"].as_array().unwrap().len(), 0);

        let voter = &value["fetchSingleLink"]["voters"][0];
        assert_eq!(voter["votes"][0]["id"], first);
        assert_eq!(voter["votes"].as_array().unwrap().len(), 1);
        assert_eq!(voter["links"].as_array().unwrap().len(), 0);
    }
}

// ============================================================================
// Listing
// ============================================================================

mod listing {
    use super::*;

    /// Two links with distinct descriptions and urls, as Alice
    async fn two_links(schema: &LinkboardSchema) -> AuthUser {
        let alice = signup(schema, "alice@example.com", "Alice").await;
        post_link(schema, alice, "x", "https://a.com").await;
        post_link(schema, alice, "y", "https://b.com").await;
        alice
    }

    #[tokio::test]
    async fn test_fetch_all_links_lists_in_id_order() {
        let (schema, _, _) = test_api();
        two_links(&schema).await;

        let value = data(exec(&schema, r#"query { fetchAllLinks { id } }"#).await);
        let ids: Vec<i64> = value["fetchAllLinks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_filter_matches_description_or_url() {
        let (schema, _, _) = test_api();
        two_links(&schema).await;

        // "a" appears only in the first link's url
        let value = data(exec(&schema, r#"query { fetchAllLinks(filter: "a") { id } }"#).await);
        let links = value["fetchAllLinks"].as_array().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0]["id"], 1);

        // "y" appears only in the second link's description
        let value = data(exec(&schema, r#"query { fetchAllLinks(filter: "y") { id } }"#).await);
        let links = value["fetchAllLinks"].as_array().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0]["id"], 2);
    }

    #[tokio::test]
    async fn test_order_by_url_descending() {
        let (schema, _, _) = test_api();
        two_links(&schema).await;

        let value = data(
            exec(
                &schema,
                r#"query { fetchAllLinks(orderBy: [{ field: URL, direction: DESC }]) { id } }"#,
            )
            .await,
        );
        let ids: Vec<i64> = value["fetchAllLinks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_multi_key_order_reaches_later_keys_on_ties() {
        let (schema, _, _) = test_api();
        let alice = signup(&schema, "alice@example.com", "Alice").await;
        post_link(&schema, alice, "same", "https://a.example").await;
        post_link(&schema, alice, "same", "https://b.example").await;
        post_link(&schema, alice, "other", "https://c.example").await;

        let value = data(
            exec(
                &schema,
                r#"query {
                    fetchAllLinks(orderBy: [
                        { field: DESCRIPTION, direction: DESC },
                        { field: URL, direction: DESC }
                    ]) { id }
                }"#,
            )
            .await,
        );
        let ids: Vec<i64> = value["fetchAllLinks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        // "same" > "other"; within "same", urls tie-break descending
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_order_by_created_at_defaults_to_ascending() {
        let (schema, _, _) = test_api();
        two_links(&schema).await;

        let value = data(
            exec(
                &schema,
                r#"query { fetchAllLinks(orderBy: [{ field: CREATED_AT }]) { id } }"#,
            )
            .await,
        );
        let ids: Vec<i64> = value["fetchAllLinks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_take_and_skip_paginate() {
        let (schema, _, _) = test_api();
        let alice = signup(&schema, "alice@example.com", "Alice").await;
        for n in 1..=5 {
            post_link(&schema, alice, &format!("link {n}"), "https://example.com").await;
        }

        let value = data(exec(&schema, r#"query { fetchAllLinks(take: 2, skip: 2) { id } }"#).await);
        let ids: Vec<i64> = value["fetchAllLinks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 4]);

        // Negative take means no limit
        let value = data(exec(&schema, r#"query { fetchAllLinks(take: -1, skip: 3) { id } }"#).await);
        let ids: Vec<i64> = value["fetchAllLinks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[tokio::test]
    async fn test_fetch_single_link_is_null_for_missing_ids() {
        let (schema, _, _) = test_api();

        let value = data(exec(&schema, r#"query { fetchSingleLink(id: 12) { id } }"#).await);
        assert!(value["fetchSingleLink"].is_null());
    }

    #[tokio::test]
    async fn test_links_without_an_author_resolve_a_null_posted_by() {
        let (schema, _, db) = test_api();
        db.links()
            .create(NewLink {
                description: "orphan".to_string(),
                url: "https://example.com".to_string(),
                posted_by_id: None,
            })
            .await
            .unwrap();

        let value = data(
            exec(
                &schema,
                r#"query { fetchSingleLink(id: 1) { id postedBy { id } } }"#,
            )
            .await,
        );
        assert_eq!(value["fetchSingleLink"]["id"], 1);
        assert!(value["fetchSingleLink"]["postedBy"].is_null());
    }
}

// ============================================================================
// LinkFeed
// ============================================================================

mod feed {
    use super::*;

    #[tokio::test]
    async fn test_feed_count_ignores_pagination() {
        let (schema, _, _) = test_api();
        let alice = signup(&schema, "alice@example.com", "Alice").await;
        for n in 1..=5 {
            post_link(&schema, alice, &format!("link {n}"), "https://example.com").await;
        }

        let value = data(
            exec(
                &schema,
                r#"query { LinkFeed(take: 2) { links { id } count id } }"#,
            )
            .await,
        );
        let feed = &value["LinkFeed"];
        assert_eq!(feed["links"].as_array().unwrap().len(), 2);
        assert_eq!(feed["count"], 5);
        assert_eq!(feed["id"], r#"main-feed:{"filter":null,"skip":null,"take":2}"#);
    }

    #[tokio::test]
    async fn test_feed_filter_applies_to_links_and_count() {
        let (schema, _, _) = test_api();
        let alice = signup(&schema, "alice@example.com", "Alice").await;
        post_link(&schema, alice, "rust book", "https://doc.rust-lang.org").await;
        post_link(&schema, alice, "graphql intro", "https://graphql.org").await;
        post_link(&schema, alice, "rustlings", "https://rustlings.run").await;

        let value = data(
            exec(
                &schema,
                r#"query { LinkFeed(filter: "rust", take: 1, skip: 1) { links { id } count id } }"#,
            )
            .await,
        );
        let feed = &value["LinkFeed"];
        assert_eq!(feed["links"].as_array().unwrap().len(), 1);
        assert_eq!(feed["links"][0]["id"], 3);
        assert_eq!(feed["count"], 2);
        assert_eq!(
            feed["id"],
            r#"main-feed:{"filter":"rust","skip":1,"take":1}"#
        );
    }

    #[tokio::test]
    async fn test_feed_id_is_stable_across_identical_requests() {
        let (schema, _, _) = test_api();

        let query = r#"query { LinkFeed(filter: "x", take: 3) { id } }"#;
        let first = data(exec(&schema, query).await);
        let second = data(exec(&schema, query).await);
        assert_eq!(first["LinkFeed"]["id"], second["LinkFeed"]["id"]);

        // Different arguments produce a different cache key
        let other = data(exec(&schema, r#"query { LinkFeed(filter: "x", take: 4) { id } }"#).await);
        assert_ne!(first["LinkFeed"]["id"], other["LinkFeed"]["id"]);
    }
}
