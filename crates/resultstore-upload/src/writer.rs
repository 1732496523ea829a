//! The invocation writer: open/resume handshake, buffered writes, flush.

use std::fmt;
use std::sync::Arc;

use resultstore_api::ResultStoreClient;
use resultstore_api::types::{
    Action, Configuration, ConfiguredTarget, CreateInvocationRequest,
    GetInvocationUploadMetadataRequest, Invocation, Target, TouchInvocationRequest,
    UploadBatchRequest, UploadRequest,
};
use tokio::time::Instant;

use crate::batch;
use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::retry::retry_rpc;
use crate::token::{ResumeTokens, TokenSource, UuidTokenSource};

/// Writes one invocation's result tree to the remote store in batches.
///
/// A writer is created once per invocation per process lifetime via
/// [`InvocationWriter::open`], which either creates the invocation or syncs
/// with the service to resume an unfinalized one. Typed writes buffer
/// envelopes; a full buffer or a [`finalize`](InvocationWriter::finalize)
/// triggers a batched upload protected by retries.
///
/// All durability lives on the service side: the resume token proves which
/// point the next batch extends from, so after a crash a fresh writer picks
/// up through the same `open` handshake.
///
/// Methods take `&mut self` and must be driven sequentially by one caller;
/// there is no internal locking. Writers for distinct invocations are fully
/// independent.
pub struct InvocationWriter<C> {
    client: C,
    invocation_id: String,
    authorization_token: String,
    config: UploadConfig,
    tokens: ResumeTokens,
    pending: Vec<UploadRequest>,
    finalized: bool,
}

impl<C> fmt::Debug for InvocationWriter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationWriter")
            .field("invocation_id", &self.invocation_id)
            .field("pending", &self.pending.len())
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

impl<C: ResultStoreClient> InvocationWriter<C> {
    /// Create invocation `invocation_id` in the store and return a writer
    /// for it.
    ///
    /// If the invocation already exists and is unfinalized, the writer syncs
    /// with the service and resumes from its held resume token. If it exists
    /// and is finalized, the original `AlreadyExists` error is returned; it
    /// is permanent and the caller must not retry. The `authorization_token`
    /// is a UUID-like string that must be identical across every call for
    /// the same invocation.
    ///
    /// Each remote call inside the handshake retries transient failures
    /// under the configured backoff; the handshake as a whole runs under one
    /// `rpc_deadline` and is not retried.
    pub async fn open(
        client: C,
        invocation: Invocation,
        invocation_id: impl Into<String>,
        authorization_token: impl Into<String>,
        config: UploadConfig,
    ) -> Result<Self, UploadError> {
        Self::open_with_tokens(
            client,
            invocation,
            invocation_id,
            authorization_token,
            config,
            Arc::new(UuidTokenSource),
        )
        .await
    }

    /// [`open`](Self::open) with an injected token source, for deterministic
    /// tests.
    pub async fn open_with_tokens(
        client: C,
        invocation: Invocation,
        invocation_id: impl Into<String>,
        authorization_token: impl Into<String>,
        config: UploadConfig,
        token_source: Arc<dyn TokenSource>,
    ) -> Result<Self, UploadError> {
        let mut writer = Self {
            client,
            invocation_id: invocation_id.into(),
            authorization_token: authorization_token.into(),
            tokens: ResumeTokens::new(token_source),
            pending: Vec::new(),
            finalized: false,
            config,
        };
        let deadline = Instant::now() + writer.config.rpc_deadline;

        let create_err = match writer.create_invocation(invocation, deadline).await {
            Ok(()) => return Ok(writer),
            Err(err) if err.is_already_exists() => err,
            Err(err) => return Err(err),
        };

        // The invocation exists, from this or a prior process. A permanent
        // touch failure means it is finalized and can never be written; the
        // caller gets the original conflict error.
        if let Err(touch_err) = writer.touch_invocation(deadline).await {
            if touch_err.is_permanent() {
                return Err(create_err);
            }
        }

        writer.retrieve_resume_token(deadline).await?;
        tracing::info!(
            invocation_id = %writer.invocation_id,
            "resuming upload for unfinalized invocation"
        );
        Ok(writer)
    }

    /// Queue a configuration for upload.
    pub async fn write_configuration(
        &mut self,
        configuration: Configuration,
    ) -> Result<(), UploadError> {
        self.append(batch::configuration_envelope(configuration))
            .await
    }

    /// Queue a target for upload.
    pub async fn write_target(&mut self, target: Target) -> Result<(), UploadError> {
        self.append(batch::target_envelope(target)).await
    }

    /// Queue a configured target for upload.
    pub async fn write_configured_target(
        &mut self,
        configured_target: ConfiguredTarget,
    ) -> Result<(), UploadError> {
        self.append(batch::configured_target_envelope(configured_target))
            .await
    }

    /// Queue an action for upload.
    pub async fn write_action(&mut self, action: Action) -> Result<(), UploadError> {
        self.append(batch::action_envelope(action)).await
    }

    /// Close the invocation and flush everything still buffered.
    ///
    /// The writer rejects further writes from the moment this is called,
    /// whether or not the flush succeeds. A failed finalize flush leaves the
    /// invocation open on the service side; recover by reopening it and
    /// finalizing again.
    pub async fn finalize(&mut self) -> Result<(), UploadError> {
        self.append(batch::finalize_envelope()).await
    }

    /// Whether the finalize marker has been appended.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The resume token the next batch will extend from.
    pub fn resume_token(&self) -> &str {
        self.tokens.current()
    }

    async fn append(&mut self, request: UploadRequest) -> Result<(), UploadError> {
        if self.finalized {
            return Err(UploadError::Finalized);
        }
        if batch::is_finalize(&request) {
            // Latched before the flush is attempted: a failed flush must not
            // reopen the writer.
            self.finalized = true;
        }
        self.pending.push(request);
        if !self.finalized && self.pending.len() < self.config.batch_size {
            return Ok(());
        }
        self.flush().await
    }

    /// Send the pending buffer as one batch. On success the staged token
    /// becomes current and the buffer clears; on failure both stay as they
    /// were, so the next flush resends the identical batch extending from
    /// the same token.
    async fn flush(&mut self) -> Result<(), UploadError> {
        let next_token = self.tokens.stage_next();
        let request = UploadBatchRequest {
            parent: self.invocation_name(),
            resume_token: self.tokens.current().to_owned(),
            next_resume_token: next_token.clone(),
            authorization_token: self.authorization_token.clone(),
            upload_requests: self.pending.clone(),
        };
        tracing::debug!(
            invocation_id = %self.invocation_id,
            envelopes = request.upload_requests.len(),
            "flushing batch"
        );

        let deadline = Instant::now() + self.config.rpc_deadline;
        let client = &self.client;
        retry_rpc("UploadBatch", &self.config.backoff, deadline, || {
            client.upload_batch(request.clone())
        })
        .await?;

        self.tokens.commit(next_token);
        self.pending.clear();
        Ok(())
    }

    async fn create_invocation(
        &self,
        invocation: Invocation,
        deadline: Instant,
    ) -> Result<(), UploadError> {
        let request = CreateInvocationRequest {
            invocation_id: self.invocation_id.clone(),
            invocation: Some(invocation),
            authorization_token: self.authorization_token.clone(),
            initial_resume_token: self.tokens.current().to_owned(),
        };
        let client = &self.client;
        retry_rpc("CreateInvocation", &self.config.backoff, deadline, || {
            client.create_invocation(request.clone())
        })
        .await?;
        Ok(())
    }

    async fn touch_invocation(&self, deadline: Instant) -> Result<(), UploadError> {
        let request = TouchInvocationRequest {
            name: self.invocation_name(),
            authorization_token: self.authorization_token.clone(),
        };
        let client = &self.client;
        retry_rpc("TouchInvocation", &self.config.backoff, deadline, || {
            client.touch_invocation(request.clone())
        })
        .await?;
        Ok(())
    }

    async fn retrieve_resume_token(&mut self, deadline: Instant) -> Result<(), UploadError> {
        let request = GetInvocationUploadMetadataRequest {
            name: self.upload_metadata_name(),
            authorization_token: self.authorization_token.clone(),
        };
        let client = &self.client;
        let metadata = retry_rpc(
            "GetInvocationUploadMetadata",
            &self.config.backoff,
            deadline,
            || client.get_invocation_upload_metadata(request.clone()),
        )
        .await?;
        self.tokens.adopt(metadata.resume_token);
        Ok(())
    }

    fn invocation_name(&self) -> String {
        format!("invocations/{}", self.invocation_id)
    }

    fn upload_metadata_name(&self) -> String {
        format!("invocations/{}/uploadMetadata", self.invocation_id)
    }
}
