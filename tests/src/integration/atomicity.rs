//! # Failure Atomicity
//!
//! A failed invocation must leave the ledger exactly as it found it: no
//! records, no balance movements, no developer-token credits.

#[cfg(test)]
mod tests {
    use dses_registry::domain::service_key;
    use dses_registry::{Address, EntityRepository, InMemoryLedger, Token, TokenStatus, U256};

    use crate::integration::{
        assert_err_contains, assert_ok, json, register_service, register_user, INK,
    };

    /// Two developers, one service each, and a mashup creator holding `funds`.
    async fn two_developer_ledger(funds: u64) -> InMemoryLedger {
        let ledger = InMemoryLedger::new();
        ledger.mint("addr-m", INK, U256::from(funds));
        register_user(&ledger, "addr-x", "xavier").await;
        register_user(&ledger, "addr-y", "yara").await;
        register_service(&ledger, "addr-x", "a", "xavier").await;
        register_service(&ledger, "addr-y", "b", "yara").await;
        ledger
    }

    #[tokio::test]
    async fn test_mashup_underfunded_leaves_no_trace() {
        // Enough for the first developer only.
        let ledger = two_developer_ledger(15).await;
        let keys_before = ledger.keys();

        let response = ledger
            .invoke("addr-m", "createMashup", &["m", "app", "combo", "a", "b"])
            .await;
        assert_err_contains(&response, "insufficient INK balance");

        assert_eq!(ledger.keys(), keys_before);
        assert!(ledger.get(&service_key("m")).is_none());
        assert!(ledger.transfers().is_empty());
        assert_eq!(ledger.balance("addr-m", INK), U256::from(15));
        assert_eq!(ledger.balance("addr-x", INK), U256::zero());

        for name in ["xavier", "yara"] {
            let user = json(&ledger.invoke("addr-m", "queryUser", &[name]).await);
            assert_eq!(user["developerToken"], 1, "{name}");
        }
    }

    #[tokio::test]
    async fn test_mashup_aborts_when_later_developer_is_gone() {
        let ledger = two_developer_ledger(100).await;
        assert_ok(&ledger.invoke("addr-y", "removeUser", &["yara"]).await);
        let keys_before = ledger.keys();

        // xavier is paid first, then yara's record is missing.
        let response = ledger
            .invoke("addr-m", "createMashup", &["m", "app", "combo", "a", "b"])
            .await;
        assert_err_contains(&response, "this user does not exist: yara");

        assert_eq!(ledger.keys(), keys_before);
        assert!(ledger.transfers().is_empty());
        assert_eq!(ledger.balance("addr-x", INK), U256::zero());
        assert_eq!(ledger.balance("addr-m", INK), U256::from(100));
        let xavier = json(&ledger.invoke("addr-m", "queryUser", &["xavier"]).await);
        assert_eq!(xavier["developerToken"], 1);
    }

    #[tokio::test]
    async fn test_reward_and_invoke_missing_service() {
        let ledger = two_developer_ledger(100).await;
        let keys_before = ledger.keys();

        let response = ledger
            .invoke("addr-m", "rewardService", &["ghost", INK, "5"])
            .await;
        assert_err_contains(&response, "this service does not exist: ghost");
        let response = ledger.invoke("addr-m", "invokeService", &["ghost"]).await;
        assert_err_contains(&response, "this service does not exist: ghost");

        assert_eq!(ledger.keys(), keys_before);
        assert!(ledger.transfers().is_empty());
    }

    #[tokio::test]
    async fn test_reward_and_invoke_after_developer_removed() {
        let ledger = two_developer_ledger(100).await;
        assert_ok(&ledger.invoke("addr-x", "removeUser", &["xavier"]).await);
        let keys_before = ledger.keys();

        let response = ledger
            .invoke("addr-m", "rewardService", &["a", INK, "5"])
            .await;
        assert_err_contains(&response, "this user does not exist: xavier");
        let response = ledger.invoke("addr-m", "invokeService", &["a"]).await;
        assert_err_contains(&response, "this user does not exist: xavier");

        assert_eq!(ledger.keys(), keys_before);
        assert!(ledger.transfers().is_empty());
        assert_eq!(ledger.balance("addr-x", INK), U256::zero());
    }

    #[tokio::test]
    async fn test_init_account_after_delivery_rejected() {
        let ledger = InMemoryLedger::new();
        ledger.mint("addr-i", "TOK", U256::from(5000));

        let tx = ledger.begin("addr-i");
        let mut token = Token::new("TOK", U256::from(1000), 8, Address::new("addr-a"));
        token.status = TokenStatus::Delivered;
        EntityRepository::new(&tx).put_token(&token).await.unwrap();
        tx.commit().unwrap();
        let stored = ledger.get("TOK");

        let response = ledger
            .invoke("addr-i", "initAccount", &["TOK", "1000", "8", "addr-a"])
            .await;
        assert_err_contains(&response, "consistency conflict");

        assert_eq!(ledger.get("TOK"), stored);
        assert!(ledger.transfers().is_empty());
        assert_eq!(ledger.balance("addr-a", "TOK"), U256::zero());
    }

    #[tokio::test]
    async fn test_mashup_with_one_missing_reference() {
        let ledger = two_developer_ledger(100).await;
        let keys_before = ledger.keys();

        let response = ledger
            .invoke("addr-m", "createMashup", &["m", "app", "combo", "a", "ghost", "b"])
            .await;
        assert_err_contains(&response, "this service does not exist: ghost");

        assert_eq!(ledger.keys(), keys_before);
        assert!(ledger.transfers().is_empty());
        assert_eq!(ledger.balance("addr-m", INK), U256::from(100));
    }

    #[tokio::test]
    async fn test_reward_underfunded_keeps_developer_token() {
        let ledger = two_developer_ledger(5).await;

        let response = ledger
            .invoke("addr-m", "rewardService", &["a", INK, "6"])
            .await;
        assert_err_contains(&response, "transfer failure");

        let user = json(&ledger.invoke("addr-m", "queryUser", &["xavier"]).await);
        assert_eq!(user["developerToken"], 1);
        assert_eq!(ledger.balance("addr-m", INK), U256::from(5));
    }

    #[tokio::test]
    async fn test_malformed_amount_rejected() {
        let ledger = two_developer_ledger(100).await;

        for amount in ["-1", "1.5", "ten", ""] {
            let response = ledger
                .invoke("addr-m", "rewardService", &["a", INK, amount])
                .await;
            assert_err_contains(&response, "invalid argument");
        }
        assert!(ledger.transfers().is_empty());
    }

    #[tokio::test]
    async fn test_ledger_unavailable() {
        let ledger = InMemoryLedger::new();
        register_user(&ledger, "addr-a", "alice").await;
        let keys_before = ledger.keys();

        ledger.set_unavailable(true);
        let response = ledger
            .invoke("addr-b", "registerUser", &["bob", "offline"])
            .await;
        assert_err_contains(&response, "repository failure");

        ledger.set_unavailable(false);
        assert_eq!(ledger.keys(), keys_before);
    }
}
