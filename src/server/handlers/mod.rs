pub mod places;
pub mod user_places;

use crate::error::{not_found_error, Error};

pub async fn not_found() -> Error {
    not_found_error()
}
