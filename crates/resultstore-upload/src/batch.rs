//! Envelope construction for the batch upload API.
//!
//! Each constructor consumes the resource, promotes its identity fields
//! into the envelope key, and clears the embedded `id` so identity is
//! carried exactly once on the wire.

use resultstore_api::types::upload_request::{Id, Resource, UploadOperation};
use resultstore_api::types::{Action, Configuration, ConfiguredTarget, Invocation, Target, UploadRequest};

pub(crate) fn configuration_envelope(mut configuration: Configuration) -> UploadRequest {
    let id = configuration.id.take().unwrap_or_default();
    UploadRequest {
        id: Some(Id {
            configuration_id: id.configuration_id,
            ..Id::default()
        }),
        upload_operation: UploadOperation::Create as i32,
        resource: Some(Resource::Configuration(configuration)),
    }
}

pub(crate) fn target_envelope(mut target: Target) -> UploadRequest {
    let id = target.id.take().unwrap_or_default();
    UploadRequest {
        id: Some(Id {
            target_id: id.target_id,
            ..Id::default()
        }),
        upload_operation: UploadOperation::Create as i32,
        resource: Some(Resource::Target(target)),
    }
}

pub(crate) fn configured_target_envelope(mut configured_target: ConfiguredTarget) -> UploadRequest {
    let id = configured_target.id.take().unwrap_or_default();
    UploadRequest {
        id: Some(Id {
            configuration_id: id.configuration_id,
            target_id: id.target_id,
            ..Id::default()
        }),
        upload_operation: UploadOperation::Create as i32,
        resource: Some(Resource::ConfiguredTarget(configured_target)),
    }
}

pub(crate) fn action_envelope(mut action: Action) -> UploadRequest {
    let id = action.id.take().unwrap_or_default();
    UploadRequest {
        id: Some(Id {
            configuration_id: id.configuration_id,
            target_id: id.target_id,
            action_id: id.action_id,
        }),
        upload_operation: UploadOperation::Create as i32,
        resource: Some(Resource::Action(action)),
    }
}

/// The marker that closes an invocation. No identity key, empty payload.
pub(crate) fn finalize_envelope() -> UploadRequest {
    UploadRequest {
        id: None,
        upload_operation: UploadOperation::Finalize as i32,
        resource: Some(Resource::Invocation(Invocation::default())),
    }
}

pub(crate) fn is_finalize(request: &UploadRequest) -> bool {
    request.upload_operation == UploadOperation::Finalize as i32
}
