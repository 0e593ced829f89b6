//! # Registry Flows
//!
//! End-to-end checks of the registry guarantees, driven through
//! `InMemoryLedger::invoke` exactly as a chain client would call the
//! chaincode: function name plus positional string arguments.

#[cfg(test)]
mod tests {
    use dses_registry::domain::{service_key, user_key};
    use dses_registry::{InMemoryLedger, Response, U256};

    use crate::integration::{
        assert_err_contains, assert_ok, json, register_service, register_user, INK,
    };

    // =============================================================================
    // USERS
    // =============================================================================

    #[tokio::test]
    async fn test_register_then_query_user() {
        let ledger = InMemoryLedger::new();

        let response = ledger
            .invoke("addr-a", "registerUser", &["alice", "weather APIs"])
            .await;
        assert_eq!(response.payload_str(), "User register & Init account success.");

        let user = json(&ledger.invoke("addr-z", "queryUser", &["alice"]).await);
        assert_eq!(user["name"], "alice");
        assert_eq!(user["introduction"], "weather APIs");
        assert_eq!(user["address"], "addr-a");
        assert_eq!(user["developerToken"], 0);
        assert_eq!(user["contribution"], 0);

        let again = ledger
            .invoke("addr-b", "registerUser", &["alice", "someone else"])
            .await;
        assert_err_contains(&again, "already exists");
    }

    #[tokio::test]
    async fn test_remove_user() {
        let ledger = InMemoryLedger::new();
        register_user(&ledger, "addr-a", "alice").await;

        let response = ledger.invoke("addr-z", "removeUser", &["alice"]).await;
        assert_eq!(response.payload_str(), "User delete success.");
        assert!(ledger.get(&user_key("alice")).is_none());

        let query = ledger.invoke("addr-a", "queryUser", &["alice"]).await;
        assert_err_contains(&query, "this user does not exist: alice");
    }

    // =============================================================================
    // SERVICES
    // =============================================================================

    #[tokio::test]
    async fn test_register_service_credits_owner() {
        let ledger = InMemoryLedger::new();
        register_user(&ledger, "addr-a", "alice").await;
        register_service(&ledger, "addr-a", "forecast", "alice").await;

        let service = json(&ledger.invoke("addr-a", "queryService", &["forecast"]).await);
        assert_eq!(service["status"], "created");
        assert_eq!(service["isMashup"], false);
        assert_eq!(service["developer"], "alice");
        assert_eq!(service["updatedTime"], "");
        assert!(service["composition"].as_object().map_or(true, |c| c.is_empty()));

        let user = json(&ledger.invoke("addr-a", "queryUser", &["alice"]).await);
        assert_eq!(user["developerToken"], 1);
    }

    #[tokio::test]
    async fn test_register_service_for_another_owner_rejected() {
        let ledger = InMemoryLedger::new();
        register_user(&ledger, "addr-a", "alice").await;

        let response = ledger
            .invoke("addr-b", "registerService", &["forecast", "rest", "d", "alice"])
            .await;
        assert_err_contains(&response, "authority error");
        assert!(ledger.get(&service_key("forecast")).is_none());
    }

    #[tokio::test]
    async fn test_publish_and_invalidate_regardless_of_status() {
        let ledger = InMemoryLedger::new();
        register_user(&ledger, "addr-a", "alice").await;
        register_service(&ledger, "addr-a", "forecast", "alice").await;

        let steps = [
            ("invalidateService", "Invalidate Service success.", "invalid"),
            ("invalidateService", "Invalidate Service success.", "invalid"),
            ("publishService", "Publish Service success.", "available"),
            ("publishService", "Publish Service success.", "available"),
            ("invalidateService", "Invalidate Service success.", "invalid"),
        ];
        for (function, message, status) in steps {
            let response = ledger.invoke("addr-a", function, &["forecast"]).await;
            assert_eq!(response.payload_str(), message);
            let service = json(&ledger.invoke("addr-a", "queryService", &["forecast"]).await);
            assert_eq!(service["status"], status, "after {function}");
        }
    }

    #[tokio::test]
    async fn test_status_change_by_other_identity_rejected() {
        let ledger = InMemoryLedger::new();
        register_user(&ledger, "addr-a", "alice").await;
        register_service(&ledger, "addr-a", "forecast", "alice").await;

        for function in ["publishService", "invalidateService"] {
            let response = ledger.invoke("addr-z", function, &["forecast"]).await;
            assert_err_contains(&response, "authority error");
        }
        let service = json(&ledger.invoke("addr-a", "queryService", &["forecast"]).await);
        assert_eq!(service["status"], "created");
    }

    #[tokio::test]
    async fn test_edit_service_fields() {
        let ledger = InMemoryLedger::new();
        register_user(&ledger, "addr-a", "alice").await;
        register_service(&ledger, "addr-a", "forecast", "alice").await;

        let edited = json(
            &ledger
                .invoke("addr-a", "editService", &["forecast", "Type", "graphql"])
                .await,
        );
        assert_eq!(edited["type"], "graphql");
        assert_ne!(edited["updatedTime"], "");

        let edited = json(
            &ledger
                .invoke("addr-a", "editService", &["forecast", "Description", "14-day"])
                .await,
        );
        assert_eq!(edited["description"], "14-day");
        assert_eq!(edited["type"], "graphql");
    }

    #[tokio::test]
    async fn test_edit_status_field_rejected_without_change() {
        let ledger = InMemoryLedger::new();
        register_user(&ledger, "addr-a", "alice").await;
        register_service(&ledger, "addr-a", "forecast", "alice").await;
        let before = ledger.get(&service_key("forecast"));

        let response = ledger
            .invoke("addr-a", "editService", &["forecast", "Status", "available"])
            .await;
        assert_err_contains(&response, "invalid argument");
        assert_eq!(ledger.get(&service_key("forecast")), before);
    }

    // =============================================================================
    // MASHUPS
    // =============================================================================

    #[tokio::test]
    async fn test_mashup_pays_each_developer_once() {
        let ledger = InMemoryLedger::new();
        ledger.mint("addr-m", INK, U256::from(100));
        register_user(&ledger, "addr-x", "xavier").await;
        register_user(&ledger, "addr-y", "yara").await;
        register_service(&ledger, "addr-x", "a", "xavier").await;
        register_service(&ledger, "addr-y", "b", "yara").await;

        let response = ledger
            .invoke("addr-m", "createMashup", &["m", "app", "combo", "a", "b", "a"])
            .await;
        assert_eq!(response.payload_str(), "Mashup register success.");

        let mashup = json(&ledger.invoke("addr-m", "queryService", &["m"]).await);
        assert_eq!(mashup["isMashup"], true);
        assert_eq!(mashup["developer"], "addr-m");
        let composition = mashup["composition"].as_object().cloned().unwrap_or_default();
        let mut names: Vec<&String> = composition.keys().collect();
        names.sort();
        assert_eq!(names, ["a", "b"]);

        let transfers = ledger.transfers();
        assert_eq!(transfers.len(), 2);
        assert_eq!(ledger.balance("addr-x", INK), U256::from(10));
        assert_eq!(ledger.balance("addr-y", INK), U256::from(10));
        assert_eq!(ledger.balance("addr-m", INK), U256::from(80));

        for name in ["xavier", "yara"] {
            let user = json(&ledger.invoke("addr-m", "queryUser", &[name]).await);
            assert_eq!(user["developerToken"], 2, "{name}");
        }
    }

    #[tokio::test]
    async fn test_mashup_over_missing_service() {
        let ledger = InMemoryLedger::new();
        ledger.mint("addr-m", INK, U256::from(100));
        let keys_before = ledger.keys();

        let response = ledger
            .invoke("addr-m", "createMashup", &["m", "app", "combo", "missing"])
            .await;
        assert_err_contains(&response, "this service does not exist: missing");

        assert_eq!(ledger.keys(), keys_before);
        assert!(ledger.transfers().is_empty());
        assert_eq!(ledger.balance("addr-m", INK), U256::from(100));
    }

    #[tokio::test]
    async fn test_mashup_name_taken() {
        let ledger = InMemoryLedger::new();
        ledger.mint("addr-m", INK, U256::from(100));
        register_user(&ledger, "addr-x", "xavier").await;
        register_service(&ledger, "addr-x", "a", "xavier").await;

        let response = ledger
            .invoke("addr-m", "createMashup", &["a", "app", "combo", "a"])
            .await;
        assert_err_contains(&response, "already exists");
        assert!(ledger.transfers().is_empty());
    }

    // =============================================================================
    // TOKENS & INCENTIVES
    // =============================================================================

    #[tokio::test]
    async fn test_init_account_reissues_and_rejects_mismatch() {
        let ledger = InMemoryLedger::new();
        ledger.mint("addr-i", "TOK", U256::from(5000));

        for _ in 0..2 {
            let response = ledger
                .invoke("addr-i", "initAccount", &["TOK", "1000", "8", "addr-a"])
                .await;
            assert_eq!(response.payload_str(), "Token issued success!");
        }
        assert_eq!(ledger.balance("addr-a", "TOK"), U256::from(2000));
        assert_eq!(ledger.transfers().len(), 2);

        let token: serde_json::Value =
            serde_json::from_slice(&ledger.get("TOK").unwrap_or_default()).unwrap_or_default();
        assert_eq!(token["tokenName"], "TOK");
        assert_eq!(token["totalSupply"], "1000");
        assert_eq!(token["status"], "created");

        let response = ledger
            .invoke("addr-i", "initAccount", &["TOK", "999", "8", "addr-a"])
            .await;
        assert_err_contains(&response, "consistency conflict");
        assert_eq!(ledger.balance("addr-a", "TOK"), U256::from(2000));
    }

    #[tokio::test]
    async fn test_reward_and_invoke_service() {
        let ledger = InMemoryLedger::new();
        ledger.mint("addr-m", INK, U256::from(1000));
        register_user(&ledger, "addr-a", "alice").await;
        register_service(&ledger, "addr-a", "forecast", "alice").await;

        let response = ledger
            .invoke("addr-m", "rewardService", &["forecast", INK, "25"])
            .await;
        assert_eq!(response.payload_str(), "Reward the service success.");
        assert_eq!(ledger.balance("addr-a", INK), U256::from(25));

        assert_ok(&ledger.invoke("addr-m", "invokeService", &["forecast"]).await);

        // +1 register, +1 reward, +2 invocation
        let user = json(&ledger.invoke("addr-m", "queryUser", &["alice"]).await);
        assert_eq!(user["developerToken"], 4);
    }

    #[tokio::test]
    async fn test_gives_token_by_policy() {
        let ledger = InMemoryLedger::new();
        ledger.mint("addr-m", INK, U256::from(1000));
        register_user(&ledger, "addr-a", "alice").await;

        assert_ok(&ledger.invoke("addr-m", "givesToken", &[INK, "alice", "5"]).await);
        assert_eq!(ledger.balance("addr-a", INK), U256::from(510));

        assert_ok(&ledger.invoke("addr-m", "givesToken", &[INK, "alice", "4"]).await);
        assert_eq!(ledger.balance("addr-a", INK), U256::from(620));

        let response = ledger.invoke("addr-m", "givesToken", &[INK, "alice", "9"]).await;
        assert_err_contains(&response, "invalid argument");
        assert_eq!(ledger.balance("addr-a", INK), U256::from(620));
    }

    // =============================================================================
    // RANGE QUERY & DISPATCH
    // =============================================================================

    #[tokio::test]
    async fn test_range_query_numbering() {
        let ledger = InMemoryLedger::new();

        let empty = json(&ledger.invoke("addr-a", "queryServiceByRange", &["", ""]).await);
        assert_eq!(empty, serde_json::json!([]));

        register_user(&ledger, "addr-a", "alice").await;
        register_service(&ledger, "addr-a", "forecast", "alice").await;
        register_service(&ledger, "addr-a", "radar", "alice").await;

        // Bounds are accepted but not applied.
        let listed = json(
            &ledger
                .invoke("addr-a", "queryServiceByRange", &["SER_a", "SER_b"])
                .await,
        );
        let records = listed.as_array().cloned().unwrap_or_default();
        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record["Number"], (i + 1).to_string());
            assert!(record["Record"].is_object());
        }
    }

    #[tokio::test]
    async fn test_dispatch_errors() {
        let ledger = InMemoryLedger::new();

        let response = ledger.invoke("addr-a", "dropTables", &["x"]).await;
        assert_eq!(response.status, Response::ERROR);
        assert_eq!(response.message, "Invalid invoke function name.");

        let response = ledger.invoke("addr-a", "registerUser", &["alice"]).await;
        assert_eq!(
            response.message,
            "Incorrect number of arguments. Expecting 2."
        );

        let response = ledger
            .invoke("addr-a", "createMashup", &["m", "app", "combo"])
            .await;
        assert_eq!(
            response.message,
            "Incorrect number of arguments. Expecting 4 at least."
        );
    }
}
