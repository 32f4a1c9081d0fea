//! External collaborators: authentication, document store and form endpoints

mod error;
mod firebase_auth;
mod firestore;
mod form_endpoint;
#[cfg(test)]
mod test_server;
mod traits;

pub use error::{AuthError, SubmissionError};
pub use firebase_auth::FirebaseAuth;
pub use firestore::FirestoreStore;
pub use form_endpoint::HttpFormEndpoint;
pub use traits::{AuthProvider, FormEndpoint, RecordStore, RequestBody};

#[cfg(test)]
pub use traits::{MockAuthProvider, MockFormEndpoint, MockRecordStore, StoredRecord};
