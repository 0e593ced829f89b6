//! # Chaincode Dispatcher
//!
//! Maps an invocation name and its positional string arguments onto
//! [`ServiceRegistryApi`] calls and wraps the outcome in a [`Response`].
//!
//! Argument counts and numeric arguments are validated here, before any
//! ledger access.

use crate::domain::{parse_amount, Address, RegistryError, RegistryResult, U256};
use crate::ports::ServiceRegistryApi;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Unknown function names fail with this message.
pub const INVALID_FUNCTION: &str = "Invalid invoke function name.";

// =============================================================================
// RESPONSE
// =============================================================================

/// Outcome of one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// [`Response::OK`] or [`Response::ERROR`].
    pub status: i32,
    /// Error text; empty on success.
    pub message: String,
    /// Success payload.
    pub payload: Vec<u8>,
}

impl Response {
    /// Success status.
    pub const OK: i32 = 200;
    /// Failure status.
    pub const ERROR: i32 = 500;

    /// Successful response carrying `payload`.
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload: payload.into(),
        }
    }

    /// Failed response carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Self::ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// True for [`Response::OK`].
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }

    /// Payload as text, lossy.
    #[must_use]
    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

// =============================================================================
// FUNCTIONS
// =============================================================================

/// Required argument count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exactly(usize),
    /// `n` or more arguments.
    AtLeast(usize),
}

impl Arity {
    /// Check `count` against the rule.
    pub fn check(self, count: usize) -> Result<(), String> {
        match self {
            Self::Exactly(n) if count != n => Err(format!(
                "Incorrect number of arguments. Expecting {n}."
            )),
            Self::AtLeast(n) if count < n => Err(format!(
                "Incorrect number of arguments. Expecting {n} at least."
            )),
            _ => Ok(()),
        }
    }
}

/// Invocable chaincode functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    /// `registerUser(name, introduction)`
    RegisterUser,
    /// `removeUser(name)`
    RemoveUser,
    /// `queryUser(name)`
    QueryUser,
    /// `initAccount(tokenName, totalSupply, decimals, address)`
    InitAccount,
    /// `registerService(name, type, description, ownerUserName)`
    RegisterService,
    /// `invalidateService(name)`
    InvalidateService,
    /// `publishService(name)`
    PublishService,
    /// `queryService(name)`
    QueryService,
    /// `editService(name, fieldName, fieldValue)`
    EditService,
    /// `createMashup(name, type, description, referencedName...)`
    CreateMashup,
    /// `queryServiceByRange(startKey, endKey)`
    QueryServiceByRange,
    /// `rewardService(serviceName, rewardType, amount)`
    RewardService,
    /// `givesToken(rewardType, userName, policyCode)`
    GivesToken,
    /// `invokeService(serviceName)`
    InvokeService,
}

impl Function {
    /// Wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RegisterUser => "registerUser",
            Self::RemoveUser => "removeUser",
            Self::QueryUser => "queryUser",
            Self::InitAccount => "initAccount",
            Self::RegisterService => "registerService",
            Self::InvalidateService => "invalidateService",
            Self::PublishService => "publishService",
            Self::QueryService => "queryService",
            Self::EditService => "editService",
            Self::CreateMashup => "createMashup",
            Self::QueryServiceByRange => "queryServiceByRange",
            Self::RewardService => "rewardService",
            Self::GivesToken => "givesToken",
            Self::InvokeService => "invokeService",
        }
    }

    /// Argument-count rule.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::RegisterUser | Self::QueryServiceByRange => Arity::Exactly(2),
            Self::RemoveUser
            | Self::QueryUser
            | Self::InvalidateService
            | Self::PublishService
            | Self::QueryService => Arity::Exactly(1),
            Self::InitAccount | Self::RegisterService => Arity::Exactly(4),
            Self::EditService => Arity::Exactly(3),
            Self::CreateMashup => Arity::AtLeast(4),
            Self::RewardService | Self::GivesToken => Arity::AtLeast(3),
            Self::InvokeService => Arity::AtLeast(1),
        }
    }

    const ALL: [Self; 14] = [
        Self::RegisterUser,
        Self::RemoveUser,
        Self::QueryUser,
        Self::InitAccount,
        Self::RegisterService,
        Self::InvalidateService,
        Self::PublishService,
        Self::QueryService,
        Self::EditService,
        Self::CreateMashup,
        Self::QueryServiceByRange,
        Self::RewardService,
        Self::GivesToken,
        Self::InvokeService,
    ];
}

impl FromStr for Function {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| INVALID_FUNCTION.to_string())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// HANDLER
// =============================================================================

fn amount_arg(raw: &str, what: &str) -> RegistryResult<U256> {
    parse_amount(raw).ok_or_else(|| {
        RegistryError::InvalidArgument(format!("expecting integer value for {what}: {raw}"))
    })
}

fn decimals_arg(raw: &str) -> RegistryResult<u32> {
    raw.parse::<u32>().map_err(|_| {
        RegistryError::InvalidArgument(format!("expecting integer value for decimals: {raw}"))
    })
}

fn json_payload<T: Serialize>(value: &T) -> RegistryResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| RegistryError::Serialization {
        key: String::from("response"),
        reason: e.to_string(),
    })
}

/// Dispatches chaincode invocations to a registry API.
pub struct ChaincodeHandler<A> {
    api: A,
}

impl<A: ServiceRegistryApi> ChaincodeHandler<A> {
    /// Wrap `api`.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The wrapped API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Chaincode instantiation.
    pub fn init(&self) -> Response {
        info!("registry chaincode initialised");
        Response::success("Init success.")
    }

    /// Run `function` with positional `args`.
    #[instrument(skip(self, args), fields(args = args.len()))]
    pub async fn invoke(&self, function: &str, args: &[String]) -> Response {
        let func = match function.parse::<Function>() {
            Ok(func) => func,
            Err(message) => {
                warn!("unknown function");
                return Response::error(message);
            }
        };

        if let Err(message) = func.arity().check(args.len()) {
            warn!(%message, "argument count rejected");
            return Response::error(message);
        }

        match self.dispatch(func, args).await {
            Ok(payload) => {
                debug!(payload_len = payload.len(), "invocation succeeded");
                Response::success(payload)
            }
            Err(e) => {
                warn!(category = ?e.category(), error = %e, "invocation failed");
                Response::error(e.to_string())
            }
        }
    }

    async fn dispatch(&self, func: Function, args: &[String]) -> RegistryResult<Vec<u8>> {
        let api = &self.api;
        match func {
            Function::RegisterUser => {
                api.register_user(&args[0], &args[1]).await?;
                Ok(b"User register & Init account success.".to_vec())
            }
            Function::RemoveUser => {
                api.remove_user(&args[0]).await?;
                Ok(b"User delete success.".to_vec())
            }
            Function::QueryUser => json_payload(&api.query_user(&args[0]).await?),
            Function::InitAccount => {
                let total_supply = amount_arg(&args[1], "totalSupply")?;
                let decimals = decimals_arg(&args[2])?;
                api.init_account(&args[0], total_supply, decimals, Address::new(&args[3]))
                    .await?;
                Ok(b"Token issued success!".to_vec())
            }
            Function::RegisterService => {
                api.register_service(&args[0], &args[1], &args[2], &args[3])
                    .await?;
                Ok(b"Service register success.".to_vec())
            }
            Function::InvalidateService => {
                api.invalidate_service(&args[0]).await?;
                Ok(b"Invalidate Service success.".to_vec())
            }
            Function::PublishService => {
                api.publish_service(&args[0]).await?;
                Ok(b"Publish Service success.".to_vec())
            }
            Function::QueryService => json_payload(&api.query_service(&args[0]).await?),
            Function::EditService => {
                json_payload(&api.edit_service(&args[0], &args[1], &args[2]).await?)
            }
            Function::CreateMashup => {
                api.create_mashup(&args[0], &args[1], &args[2], &args[3..])
                    .await?;
                Ok(b"Mashup register success.".to_vec())
            }
            Function::QueryServiceByRange => {
                json_payload(&api.query_service_by_range(&args[0], &args[1]).await?)
            }
            Function::RewardService => {
                let amount = amount_arg(&args[2], "amount")?;
                api.reward_service(&args[0], &args[1], amount).await?;
                Ok(b"Reward the service success.".to_vec())
            }
            Function::GivesToken => {
                api.gives_token(&args[0], &args[1], &args[2]).await?;
                Ok(b"Reward the service success.".to_vec())
            }
            Function::InvokeService => {
                api.invoke_service(&args[0]).await?;
                Ok(b"Reward the service success.".to_vec())
            }
        }
    }
}
