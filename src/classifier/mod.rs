/// Layer-call recognition and verb classification.
pub mod layer_call;
