//! Client surface for the upload API.
//!
//! [`ResultStoreClient`] is the seam the uploader is written against: four
//! unary RPCs returning `tonic::Status` on failure. Tests script fakes
//! against the trait; production wraps a connected channel in
//! [`GrpcResultStoreClient`]. Channel construction and credentials are the
//! caller's responsibility.

use async_trait::async_trait;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Status};

use crate::types::{
    CreateInvocationRequest, GetInvocationUploadMetadataRequest, Invocation,
    TouchInvocationRequest, TouchInvocationResponse, UploadBatchRequest, UploadBatchResponse,
    UploadMetadata,
};

/// The four upload RPCs the uploader drives.
///
/// Implementations perform exactly one call per invocation of a method; all
/// retry decisions belong to the caller.
#[async_trait]
pub trait ResultStoreClient: Send + Sync {
    /// Create a new invocation record.
    async fn create_invocation(
        &self,
        request: CreateInvocationRequest,
    ) -> Result<Invocation, Status>;

    /// Probe that an invocation exists and is still open.
    async fn touch_invocation(
        &self,
        request: TouchInvocationRequest,
    ) -> Result<TouchInvocationResponse, Status>;

    /// Fetch the resume token the service holds for an invocation.
    async fn get_invocation_upload_metadata(
        &self,
        request: GetInvocationUploadMetadataRequest,
    ) -> Result<UploadMetadata, Status>;

    /// Append a batch of envelopes to an invocation.
    async fn upload_batch(
        &self,
        request: UploadBatchRequest,
    ) -> Result<UploadBatchResponse, Status>;
}

const CREATE_INVOCATION_PATH: &str = "/resultstore.upload.v1.ResultStoreUpload/CreateInvocation";
const TOUCH_INVOCATION_PATH: &str = "/resultstore.upload.v1.ResultStoreUpload/TouchInvocation";
const GET_UPLOAD_METADATA_PATH: &str =
    "/resultstore.upload.v1.ResultStoreUpload/GetInvocationUploadMetadata";
const UPLOAD_BATCH_PATH: &str = "/resultstore.upload.v1.ResultStoreUpload/UploadBatch";

/// [`ResultStoreClient`] over a connected gRPC channel.
///
/// Cheap to clone; clones share the underlying channel.
#[derive(Debug, Clone)]
pub struct GrpcResultStoreClient {
    inner: Grpc<Channel>,
}

impl GrpcResultStoreClient {
    /// Wrap an already-connected channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    async fn unary<Req, Resp>(&self, path: &'static str, request: Req) -> Result<Resp, Status>
    where
        Req: prost::Message + 'static,
        Resp: prost::Message + Default + 'static,
    {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|err| Status::unknown(format!("service was not ready: {err}")))?;
        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = grpc
            .unary(Request::new(request), PathAndQuery::from_static(path), codec)
            .await?;
        Ok(response.into_inner())
    }
}

#[async_trait]
impl ResultStoreClient for GrpcResultStoreClient {
    async fn create_invocation(
        &self,
        request: CreateInvocationRequest,
    ) -> Result<Invocation, Status> {
        self.unary(CREATE_INVOCATION_PATH, request).await
    }

    async fn touch_invocation(
        &self,
        request: TouchInvocationRequest,
    ) -> Result<TouchInvocationResponse, Status> {
        self.unary(TOUCH_INVOCATION_PATH, request).await
    }

    async fn get_invocation_upload_metadata(
        &self,
        request: GetInvocationUploadMetadataRequest,
    ) -> Result<UploadMetadata, Status> {
        self.unary(GET_UPLOAD_METADATA_PATH, request).await
    }

    async fn upload_batch(
        &self,
        request: UploadBatchRequest,
    ) -> Result<UploadBatchResponse, Status> {
        self.unary(UPLOAD_BATCH_PATH, request).await
    }
}
