//! Multicall client
//!
//! Compiles a batch, hands the aggregate request to a [`CallTransport`], and
//! decodes the reply. Encoding errors abort before anything is sent; reply
//! and transport errors abort the whole batch.

use alloy::eips::BlockNumberOrTag;
use tracing::debug;

use crate::{
    call::ViewCalls,
    config::MulticallConfig,
    errors::MulticallError,
    transport::CallTransport,
    types::{BatchResult, CallRequest},
};

/// Batches view calls through an aggregator contract
///
/// Holds no per-batch state; concurrent calls through `&self` are fine.
#[derive(Debug, Clone)]
pub struct Multicall<T> {
    transport: T,
    config: MulticallConfig,
}

impl<T: CallTransport> Multicall<T> {
    pub fn new(transport: T, config: MulticallConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &MulticallConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the outbound `eth_call` request for a batch without sending it
    pub fn request(&self, calls: &ViewCalls) -> Result<CallRequest, MulticallError> {
        Ok(CallRequest {
            to: self.config.multicall_address,
            data: calls.call_data()?,
            gas: self.config.gas,
        })
    }

    /// Execute a batch and decode the return values of every successful call
    ///
    /// # Returns
    /// * `Ok(BatchResult)` - One entry per distinct key
    /// * `Err(MulticallError)` - Encoding, transport or reply failure
    pub async fn call(
        &self,
        calls: &ViewCalls,
        block: BlockNumberOrTag,
    ) -> Result<BatchResult, MulticallError> {
        let raw = self.execute(calls, block).await?;
        let result = calls.decode(&raw)?;
        debug!(block_number = result.block_number, calls = calls.len(), "aggregate reply decoded");
        Ok(result)
    }

    /// Execute a batch and keep every call's raw return data undecoded
    pub async fn call_raw(
        &self,
        calls: &ViewCalls,
        block: BlockNumberOrTag,
    ) -> Result<BatchResult, MulticallError> {
        let raw = self.execute(calls, block).await?;
        Ok(calls.decode_raw(&raw)?)
    }

    async fn execute(
        &self,
        calls: &ViewCalls,
        block: BlockNumberOrTag,
    ) -> Result<String, MulticallError> {
        let request = self.request(calls)?;
        debug!(
            to = %request.to,
            calls = calls.len(),
            bytes = request.data.len(),
            block = ?block,
            "dispatching aggregate call"
        );
        Ok(self.transport.eth_call(&request, block).await?)
    }
}
