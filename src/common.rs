pub mod dates;
pub mod db_utils;
pub mod error;
pub mod numeric;
