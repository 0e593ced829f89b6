//! # Registry Configuration
//!
//! Incentive parameters: the platform token paid on mashup creation, the
//! per-developer mashup incentive, and the fixed-amount policy table used by
//! `givesToken`.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DSES_INCENTIVE_TOKEN` | `INK` | Token paid to contributing developers |
//! | `DSES_MASHUP_INCENTIVE` | `10` | Amount paid per unique developer |

use crate::domain::{parse_amount, DecimalU256, RegistryError, RegistryResult, U256};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Default platform token.
pub const DEFAULT_INCENTIVE_TOKEN: &str = "INK";

/// Default mashup incentive per contributing developer.
pub const DEFAULT_MASHUP_INCENTIVE: u64 = 10;

// =============================================================================
// INCENTIVE ACTIONS
// =============================================================================

/// Actions rewarded through the policy table, keyed by their wire code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncentiveAction {
    /// Code `1`.
    RegisterService,
    /// Code `2`.
    RegisterMashup,
    /// Code `3`.
    ServiceInvoked,
    /// Code `4`: a user tips a service provider.
    UserTip,
    /// Code `5`.
    RegisterUser,
    /// Code `6`.
    Comment,
    /// Code `7`: every ten votes.
    Vote,
}

impl IncentiveAction {
    /// All actions in code order.
    pub const ALL: [Self; 7] = [
        Self::RegisterService,
        Self::RegisterMashup,
        Self::ServiceInvoked,
        Self::UserTip,
        Self::RegisterUser,
        Self::Comment,
        Self::Vote,
    ];

    /// The numeric wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::RegisterService => 1,
            Self::RegisterMashup => 2,
            Self::ServiceInvoked => 3,
            Self::UserTip => 4,
            Self::RegisterUser => 5,
            Self::Comment => 6,
            Self::Vote => 7,
        }
    }
}

impl FromStr for IncentiveAction {
    type Err = RegistryError;

    /// Parses the exact code string; `"01"` or `" 1"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.code().to_string() == s)
            .ok_or_else(|| RegistryError::InvalidArgument(format!("unknown incentive code: {s}")))
    }
}

impl fmt::Display for IncentiveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// =============================================================================
// POLICY TABLE
// =============================================================================

/// Fixed reward amount per incentive action.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncentivePolicy {
    #[serde_as(as = "BTreeMap<_, DecimalU256>")]
    rewards: BTreeMap<IncentiveAction, U256>,
}

impl IncentivePolicy {
    /// An empty table; every lookup fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rewards: BTreeMap::new(),
        }
    }

    /// Sets the reward for one action.
    #[must_use]
    pub fn with_reward(mut self, action: IncentiveAction, amount: U256) -> Self {
        self.rewards.insert(action, amount);
        self
    }

    /// Fixed amount for `action`, if the table has one.
    #[must_use]
    pub fn amount_for(&self, action: IncentiveAction) -> Option<U256> {
        self.rewards.get(&action).copied()
    }

    /// Resolves a wire code straight to its amount.
    pub fn amount_for_code(&self, code: &str) -> RegistryResult<U256> {
        let action = code.parse::<IncentiveAction>()?;
        self.amount_for(action).ok_or_else(|| {
            RegistryError::InvalidArgument(format!("no reward configured for code {code}"))
        })
    }

    /// Number of configured actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// True when nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

impl Default for IncentivePolicy {
    fn default() -> Self {
        let standard = U256::from(110);
        Self::empty()
            .with_reward(IncentiveAction::RegisterService, standard)
            .with_reward(IncentiveAction::RegisterMashup, standard)
            .with_reward(IncentiveAction::ServiceInvoked, standard)
            .with_reward(IncentiveAction::UserTip, standard)
            .with_reward(IncentiveAction::RegisterUser, U256::from(510))
            .with_reward(IncentiveAction::Comment, standard)
            .with_reward(IncentiveAction::Vote, standard)
    }
}

// =============================================================================
// REGISTRY CONFIG
// =============================================================================

/// Registry configuration.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Token paid to contributing developers on mashup creation.
    pub incentive_token: String,
    /// Amount paid to each unique contributing developer.
    #[serde_as(as = "DecimalU256")]
    pub mashup_incentive: U256,
    /// Fixed-amount policy table for `givesToken`.
    #[serde(default)]
    pub policy: IncentivePolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            incentive_token: DEFAULT_INCENTIVE_TOKEN.to_string(),
            mashup_incentive: U256::from(DEFAULT_MASHUP_INCENTIVE),
            policy: IncentivePolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables.
    ///
    /// Unparsable overrides are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(token) = env::var("DSES_INCENTIVE_TOKEN") {
            if token.is_empty() {
                warn!("DSES_INCENTIVE_TOKEN is empty, keeping {}", config.incentive_token);
            } else {
                config.incentive_token = token;
            }
        }

        if let Ok(raw) = env::var("DSES_MASHUP_INCENTIVE") {
            match parse_amount(&raw) {
                Some(amount) => config.mashup_incentive = amount,
                None => warn!(value = %raw, "ignoring invalid DSES_MASHUP_INCENTIVE"),
            }
        }

        config
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> RegistryResult<()> {
        if self.incentive_token.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "incentive token must not be empty".to_string(),
            ));
        }
        if self.policy.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "incentive policy table must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
