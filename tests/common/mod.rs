pub mod firestore_helpers;
pub mod utils;
