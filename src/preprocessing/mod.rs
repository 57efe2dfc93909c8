/// Модуль предобработки данных

pub mod column_transformer;
pub mod encoding;
pub mod normalization;

pub use column_transformer::{ColumnTransformer, FittedColumnTransformer};
pub use encoding::OneHotEncoder;
pub use normalization::StandardScaler;
