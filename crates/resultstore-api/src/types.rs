//! Message types for the upload API.
//!
//! Every resource carries its full identity in an `id` submessage. When a
//! resource is wrapped in an [`UploadRequest`] envelope the identity moves
//! into the envelope key and the embedded `id` is cleared, so identity is
//! never represented twice on the wire.

/// Key/value metadata attached to a resource.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Property {
    /// Metadata key.
    #[prost(string, tag = "1")]
    pub key: String,
    /// Metadata value.
    #[prost(string, tag = "2")]
    pub value: String,
}

/// Aggregate outcome of a resource.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatusAttributes {
    /// Coarse build/test status.
    #[prost(enumeration = "BuildStatus", tag = "1")]
    pub status: i32,
    /// Human-readable elaboration of the status.
    #[prost(string, tag = "2")]
    pub description: String,
}

/// Coarse status of a resource in the result tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum BuildStatus {
    /// Status was not reported.
    Unspecified = 0,
    /// The resource is still building.
    Building = 1,
    /// Built successfully, not tested.
    Built = 2,
    /// The build itself failed.
    FailedToBuild = 3,
    /// Tests are running.
    Testing = 4,
    /// All tests passed.
    Passed = 5,
    /// At least one test failed.
    Failed = 6,
    /// Execution exceeded its time limit.
    TimedOut = 7,
    /// Cancelled before completion.
    Cancelled = 8,
    /// The run ended before the resource completed.
    Incomplete = 9,
}

/// Wall-clock timing of a resource.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Timing {
    /// Start time, milliseconds since the Unix epoch.
    #[prost(int64, tag = "1")]
    pub start_time_millis: i64,
    /// Duration in milliseconds.
    #[prost(int64, tag = "2")]
    pub duration_millis: i64,
}

/// The top-level record for one build/test run.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Invocation {
    /// Identity; cleared when the invocation rides inside an envelope.
    #[prost(message, optional, tag = "1")]
    pub id: Option<invocation::Id>,
    /// Aggregate status.
    #[prost(message, optional, tag = "2")]
    pub status_attributes: Option<StatusAttributes>,
    /// Overall timing.
    #[prost(message, optional, tag = "3")]
    pub timing: Option<Timing>,
    /// Arbitrary caller metadata.
    #[prost(message, repeated, tag = "4")]
    pub properties: Vec<Property>,
}

/// Nested identity types for [`Invocation`].
pub mod invocation {
    /// Identity of an invocation.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Id {
        /// Caller-supplied identifier, stable across resumes.
        #[prost(string, tag = "1")]
        pub invocation_id: String,
    }
}

/// One named build configuration within an invocation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Configuration {
    /// Identity; cleared when the configuration rides inside an envelope.
    #[prost(message, optional, tag = "1")]
    pub id: Option<configuration::Id>,
    /// Aggregate status.
    #[prost(message, optional, tag = "2")]
    pub status_attributes: Option<StatusAttributes>,
    /// Display name shown by result browsers.
    #[prost(string, tag = "3")]
    pub display_name: String,
    /// Arbitrary caller metadata.
    #[prost(message, repeated, tag = "4")]
    pub properties: Vec<Property>,
}

/// Nested identity types for [`Configuration`].
pub mod configuration {
    /// Identity of a configuration.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Id {
        /// The enclosing invocation.
        #[prost(string, tag = "1")]
        pub invocation_id: String,
        /// Configuration identifier, unique within the invocation.
        #[prost(string, tag = "2")]
        pub configuration_id: String,
    }
}

/// One buildable/testable unit within an invocation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Target {
    /// Identity; cleared when the target rides inside an envelope.
    #[prost(message, optional, tag = "1")]
    pub id: Option<target::Id>,
    /// Aggregate status.
    #[prost(message, optional, tag = "2")]
    pub status_attributes: Option<StatusAttributes>,
    /// Overall timing.
    #[prost(message, optional, tag = "3")]
    pub timing: Option<Timing>,
    /// Arbitrary caller metadata.
    #[prost(message, repeated, tag = "4")]
    pub properties: Vec<Property>,
}

/// Nested identity types for [`Target`].
pub mod target {
    /// Identity of a target.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Id {
        /// The enclosing invocation.
        #[prost(string, tag = "1")]
        pub invocation_id: String,
        /// Target identifier, unique within the invocation.
        #[prost(string, tag = "2")]
        pub target_id: String,
    }
}

/// A target built/tested under one specific configuration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfiguredTarget {
    /// Identity; cleared when the resource rides inside an envelope.
    #[prost(message, optional, tag = "1")]
    pub id: Option<configured_target::Id>,
    /// Aggregate status.
    #[prost(message, optional, tag = "2")]
    pub status_attributes: Option<StatusAttributes>,
    /// Overall timing.
    #[prost(message, optional, tag = "3")]
    pub timing: Option<Timing>,
    /// Arbitrary caller metadata.
    #[prost(message, repeated, tag = "4")]
    pub properties: Vec<Property>,
}

/// Nested identity types for [`ConfiguredTarget`].
pub mod configured_target {
    /// Identity of a configured target.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Id {
        /// The enclosing invocation.
        #[prost(string, tag = "1")]
        pub invocation_id: String,
        /// The target being configured.
        #[prost(string, tag = "2")]
        pub target_id: String,
        /// The configuration it is built under.
        #[prost(string, tag = "3")]
        pub configuration_id: String,
    }
}

/// One executed step (build action, test shard run, ...) of a configured
/// target.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Action {
    /// Identity; cleared when the action rides inside an envelope.
    #[prost(message, optional, tag = "1")]
    pub id: Option<action::Id>,
    /// Aggregate status.
    #[prost(message, optional, tag = "2")]
    pub status_attributes: Option<StatusAttributes>,
    /// Overall timing.
    #[prost(message, optional, tag = "3")]
    pub timing: Option<Timing>,
    /// Arbitrary caller metadata.
    #[prost(message, repeated, tag = "4")]
    pub properties: Vec<Property>,
}

/// Nested identity types for [`Action`].
pub mod action {
    /// Identity of an action.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Id {
        /// The enclosing invocation.
        #[prost(string, tag = "1")]
        pub invocation_id: String,
        /// The enclosing target.
        #[prost(string, tag = "2")]
        pub target_id: String,
        /// The configuration the target is built under.
        #[prost(string, tag = "3")]
        pub configuration_id: String,
        /// Action identifier, unique within the configured target.
        #[prost(string, tag = "4")]
        pub action_id: String,
    }
}

/// Envelope for one resource write (or the finalize marker) in a batch.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UploadRequest {
    /// Identity key of the enclosed resource, relative to the invocation.
    /// Absent on finalize markers.
    #[prost(message, optional, tag = "1")]
    pub id: Option<upload_request::Id>,
    /// Operation the service applies to the enclosed resource.
    #[prost(enumeration = "upload_request::UploadOperation", tag = "2")]
    pub upload_operation: i32,
    /// The resource payload, identity fields cleared.
    #[prost(oneof = "upload_request::Resource", tags = "3, 4, 5, 6, 7")]
    pub resource: Option<upload_request::Resource>,
}

/// Nested types for [`UploadRequest`].
pub mod upload_request {
    /// Identity key of an enveloped resource. Which fields are set depends
    /// on the resource kind; unused fields stay empty.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Id {
        /// Set for configurations, configured targets, and actions.
        #[prost(string, tag = "1")]
        pub configuration_id: String,
        /// Set for targets, configured targets, and actions.
        #[prost(string, tag = "2")]
        pub target_id: String,
        /// Set for actions only.
        #[prost(string, tag = "3")]
        pub action_id: String,
    }

    /// Operation the service applies to the enclosed resource.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum UploadOperation {
        /// Default; rejected by the service.
        Unspecified = 0,
        /// Create the enclosed resource.
        Create = 1,
        /// Close the invocation to further writes.
        Finalize = 2,
    }

    /// The resource carried by an envelope.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Resource {
        /// Present only on finalize markers, as an empty invocation.
        #[prost(message, tag = "3")]
        Invocation(super::Invocation),
        /// A configuration to create.
        #[prost(message, tag = "4")]
        Configuration(super::Configuration),
        /// A target to create.
        #[prost(message, tag = "5")]
        Target(super::Target),
        /// A configured target to create.
        #[prost(message, tag = "6")]
        ConfiguredTarget(super::ConfiguredTarget),
        /// An action to create.
        #[prost(message, tag = "7")]
        Action(super::Action),
    }
}

/// Request to create a new invocation record.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateInvocationRequest {
    /// Caller-supplied invocation identifier.
    #[prost(string, tag = "1")]
    pub invocation_id: String,
    /// Initial invocation payload.
    #[prost(message, optional, tag = "2")]
    pub invocation: Option<Invocation>,
    /// Proof of ownership; must be identical on every call that references
    /// this invocation.
    #[prost(string, tag = "3")]
    pub authorization_token: String,
    /// Resume token the first batch must extend from.
    #[prost(string, tag = "4")]
    pub initial_resume_token: String,
}

/// Request to probe that an invocation exists and is still open.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TouchInvocationRequest {
    /// Resource name, `invocations/{invocation_id}`.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Proof of ownership.
    #[prost(string, tag = "2")]
    pub authorization_token: String,
}

/// Acknowledgement of a touch.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TouchInvocationResponse {
    /// Resource name of the touched invocation.
    #[prost(string, tag = "1")]
    pub name: String,
}

/// Request for the upload metadata of an invocation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetInvocationUploadMetadataRequest {
    /// Resource name, `invocations/{invocation_id}/uploadMetadata`.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Proof of ownership.
    #[prost(string, tag = "2")]
    pub authorization_token: String,
}

/// Service-held upload state for an invocation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UploadMetadata {
    /// Resource name of this metadata.
    #[prost(string, tag = "1")]
    pub name: String,
    /// The token the next batch must extend from.
    #[prost(string, tag = "2")]
    pub resume_token: String,
}

/// Request to append a batch of envelopes to an invocation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UploadBatchRequest {
    /// Resource name of the invocation, `invocations/{invocation_id}`.
    #[prost(string, tag = "1")]
    pub parent: String,
    /// The token this batch extends from.
    #[prost(string, tag = "2")]
    pub resume_token: String,
    /// The token the service hands back once it accepts this batch.
    #[prost(string, tag = "3")]
    pub next_resume_token: String,
    /// Proof of ownership.
    #[prost(string, tag = "4")]
    pub authorization_token: String,
    /// Ordered envelopes to apply.
    #[prost(message, repeated, tag = "5")]
    pub upload_requests: Vec<UploadRequest>,
}

/// Acknowledgement of an accepted batch.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct UploadBatchResponse {}
