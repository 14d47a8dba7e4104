//! Torch components: activations, MLP modules, optimizers and regressors
mod activation;
mod mlp;
mod optimizer;
mod regressor;
mod serialize;

pub use activation::Activation;
pub use mlp::{Mlp, MlpConfig};
pub use optimizer::SgdConfig;
pub use regressor::{MlpRegressor, MlpRegressorConfig, RegressorWeights};
pub use serialize::{ByteOrder, ByteOrderError, KindDef, TensorData};
