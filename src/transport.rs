//! Transport boundary for the aggregate `eth_call`
//!
//! The crate never talks to the network itself. A [`CallTransport`] takes the
//! outbound request and a block reference and returns the raw hex reply.
//! [`RpcTransport`] implements it on top of any alloy provider.

use std::future::Future;
use std::marker::PhantomData;

use alloy::{
    eips::BlockNumberOrTag,
    network::{AnyNetwork, Ethereum, Network},
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
};

use crate::{errors::ConfigError, types::CallRequest};

/// Executes a read-only `eth_call`
///
/// Errors are opaque to this crate and surfaced to the caller unchanged.
pub trait CallTransport {
    /// Submit `request` against `block` and return the hex-encoded return data
    fn eth_call(
        &self,
        request: &CallRequest,
        block: BlockNumberOrTag,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// [`CallTransport`] backed by an alloy [`Provider`]
///
/// Sends a raw `eth_call` JSON-RPC request with params `[request, block]`.
#[derive(Debug, Clone)]
pub struct RpcTransport<P, N = Ethereum> {
    provider: P,
    _network: PhantomData<N>,
}

impl<P, N> RpcTransport<P, N>
where
    P: Provider<N>,
    N: Network,
{
    pub fn new(provider: P) -> Self {
        Self { provider, _network: PhantomData }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl RpcTransport<DynProvider<AnyNetwork>, AnyNetwork> {
    /// Connect to an HTTP(S) or WebSocket endpoint
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// use view_multicall::transport::RpcTransport;
    /// let transport = RpcTransport::connect("https://eth.llamarpc.com").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(rpc_url: &str) -> Result<Self, ConfigError> {
        let provider = if rpc_url.starts_with("http") {
            let url = rpc_url
                .parse()
                .map_err(|_| ConfigError::InvalidRpcUrl(rpc_url.to_string()))?;
            ProviderBuilder::new().network::<AnyNetwork>().connect_http(url).erased()
        } else {
            let ws_connect = WsConnect::new(rpc_url);
            ProviderBuilder::new()
                .network::<AnyNetwork>()
                .connect_ws(ws_connect)
                .await
                .map_err(|e| ConfigError::Connection(e.to_string()))?
                .erased()
        };
        Ok(Self::new(provider))
    }
}

impl<P, N> CallTransport for RpcTransport<P, N>
where
    P: Provider<N>,
    N: Network,
{
    fn eth_call(
        &self,
        request: &CallRequest,
        block: BlockNumberOrTag,
    ) -> impl Future<Output = anyhow::Result<String>> + Send {
        let params = (request.clone(), block);
        async move {
            let raw: String = self.provider.raw_request("eth_call".into(), params).await?;
            Ok(raw)
        }
    }
}
