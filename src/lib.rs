//! # view-multicall
//!
//! Batch many read-only contract calls into a single `eth_call` through an
//! on-chain multicall aggregator, and decode the reply into keyed results.
//!
//! ## Core Features
//!
//! - **Call compilation**
//!   - Human-readable signatures: `balanceOf(address)(uint256)`
//!   - Selector computation from the canonical `name(args)` form
//!   - Loose argument values coerced to their declared ABI types
//!
//! - **Batch decoding**
//!   - Per-call success flags; one reverting call never fails the batch
//!   - Return values decoded from the signature's return types
//!   - Revert reason extraction for failed calls
//!
//! ## Features
//!
//! - `rustls-tls`: Uses rustls as the TLS implementation instead of native-tls (OpenSSL).
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use view_multicall::{
//!     Multicall, MulticallConfig, ViewCall, ViewCalls,
//!     transport::RpcTransport,
//! };
//! use alloy::{eips::BlockNumberOrTag, primitives::address};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let transport = RpcTransport::connect("https://eth.llamarpc.com").await?;
//! let multicall = Multicall::new(transport, MulticallConfig::default().with_gas(20_000_000));
//!
//! let usdc = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
//! let calls: ViewCalls = vec![
//!     ViewCall::new("symbol", usdc, "symbol()(string)", vec![]),
//!     ViewCall::new(
//!         "balance",
//!         usdc,
//!         "balanceOf(address)(uint256)",
//!         vec!["0x28C6c06298d514Db089934071355E5743bf21d60".into()],
//!     ),
//! ]
//! .into();
//!
//! let result = multicall.call(&calls, BlockNumberOrTag::Latest).await?;
//! println!("block {}", result.block_number);
//! if let Some(balance) = result.get("balance") {
//!     match balance.success {
//!         true => println!("balance: {:?}", balance.decoded),
//!         false => println!("reverted: {:?}", balance.revert_reason()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `call`: Call descriptions, signature parsing, argument coercion
//! - `aggregate`: Aggregate payload encoding and reply decoding
//! - `multicall`: Client tying compilation, transport and decoding together
//! - `transport`: The `eth_call` boundary
//! - `config`: Aggregator address, gas limit, presets
//! - `types`: Argument, result and request types
//! - `revert`: Revert payload decoding
//! - `errors`: Error types and handling

pub mod types;
pub mod call;
pub mod aggregate;
pub mod multicall;
pub mod transport;
pub mod config;
pub mod revert;
pub mod errors;

// Re-export only the essential types and functions
pub use call::{ViewCall, ViewCalls};
pub use config::{MulticallConfig, Preset};
pub use errors::MulticallError;
pub use multicall::Multicall;
pub use transport::CallTransport;
pub use types::{ArgValue, BatchResult, CallResult, ReturnValue};
