
use crate::steps::StepsError;
use crate::expr::var::TryFromStringError;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
  #[error("{0}")]
  StepsError(#[from] StepsError),
  #[error("{0}")]
  InvalidVariable(#[from] TryFromStringError),
}
