pub mod bookings;
pub mod feedback;
mod http;
pub mod memory;
pub mod notifications;
pub mod paging;
pub mod profiles;
pub mod repository;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
