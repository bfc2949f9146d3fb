/// Linearly scaled mean rate of return. See [`RateOfReturn`](rate_of_return::RateOfReturn).
pub mod rate_of_return;
