//! Ownership gate for update and delete.
//!
//! Every mutation of an owned record goes through [`authorize`] first. The
//! checks run in a fixed order so callers can tell the failures apart:
//!
//! 1. the record must exist (`NotFound`),
//! 2. the request must carry an identity (`Unauthenticated`),
//! 3. that identity must equal the record's owner (`Forbidden`).
//!
//! The gate only reads. The caller performs the mutation after receiving
//! `Authorized`, and the store conditions that mutation on the record still
//! existing.

pub mod error;

use async_trait::async_trait;

use crate::auth::UserId;
use crate::database::StoreError;
use crate::types::Mutation;

pub use error::MutationError;

/// A record bound to exactly one owner at creation.
pub trait OwnedRecord {
    fn owner(&self) -> &UserId;
}

/// Read access the gate needs to load the current state of a record.
#[async_trait]
pub trait RecordLookup<R: Send>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<R>, StoreError>;
}

/// Closed set of gate results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome<R> {
    NotFound,
    Unauthenticated,
    Forbidden,
    Authorized(R),
}

impl<R> GateOutcome<R> {
    pub fn kind(&self) -> &'static str {
        match self {
            GateOutcome::NotFound => "not_found",
            GateOutcome::Unauthenticated => "unauthenticated",
            GateOutcome::Forbidden => "forbidden",
            GateOutcome::Authorized(_) => "authorized",
        }
    }

    pub fn into_result(self) -> Result<R, MutationError> {
        match self {
            GateOutcome::Authorized(record) => Ok(record),
            GateOutcome::NotFound => Err(MutationError::NotFound),
            GateOutcome::Unauthenticated => Err(MutationError::Unauthenticated),
            GateOutcome::Forbidden => Err(MutationError::Forbidden),
        }
    }
}

/// Pure decision over an already loaded record.
pub fn decide<R: OwnedRecord>(record: Option<R>, caller: Option<&UserId>) -> GateOutcome<R> {
    let Some(record) = record else {
        return GateOutcome::NotFound;
    };
    let Some(caller) = caller else {
        return GateOutcome::Unauthenticated;
    };

    if record.owner() == caller {
        GateOutcome::Authorized(record)
    } else {
        GateOutcome::Forbidden
    }
}

/// Load the record and decide whether `caller` may apply `mutation` to it.
///
/// A store failure is returned as `Err`; it is not an authorization answer.
pub async fn authorize<R, L>(
    id: &str,
    caller: Option<&UserId>,
    mutation: Mutation,
    lookup: &L,
) -> Result<GateOutcome<R>, StoreError>
where
    R: OwnedRecord + Send,
    L: RecordLookup<R> + ?Sized,
{
    let record = lookup.find_by_id(id).await?;
    let outcome = decide(record, caller);

    tracing::debug!(
        record_id = %id,
        caller = caller.map(UserId::as_str).unwrap_or("<none>"),
        %mutation,
        outcome = outcome.kind(),
        "ownership gate decision"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        id: String,
        owner: UserId,
        body: String,
    }

    impl OwnedRecord for Note {
        fn owner(&self) -> &UserId {
            &self.owner
        }
    }

    #[derive(Default)]
    struct Notes {
        rows: HashMap<String, Note>,
        reads: AtomicUsize,
    }

    impl Notes {
        fn with(notes: impl IntoIterator<Item = Note>) -> Self {
            Self {
                rows: notes.into_iter().map(|n| (n.id.clone(), n)).collect(),
                reads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RecordLookup<Note> for Notes {
        async fn find_by_id(&self, id: &str) -> Result<Option<Note>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.get(id).cloned())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl RecordLookup<Note> for Unreachable {
        async fn find_by_id(&self, _id: &str) -> Result<Option<Note>, StoreError> {
            Err(StoreError::Connection("connection refused".to_string()))
        }
    }

    fn note(id: &str, owner: &str) -> Note {
        Note {
            id: id.to_string(),
            owner: UserId::new(owner),
            body: "lunch money".to_string(),
        }
    }

    #[tokio::test]
    async fn owner_is_authorized() {
        let store = Notes::with([note("n1", "alice")]);
        let alice = UserId::new("alice");

        let outcome = authorize("n1", Some(&alice), Mutation::Update, &store).await.unwrap();
        assert_eq!(outcome, GateOutcome::Authorized(note("n1", "alice")));
    }

    #[tokio::test]
    async fn other_identity_is_forbidden() {
        let store = Notes::with([note("n1", "alice")]);
        let bob = UserId::new("bob");

        let outcome = authorize("n1", Some(&bob), Mutation::Delete, &store).await.unwrap();
        assert_eq!(outcome, GateOutcome::Forbidden);
    }

    #[tokio::test]
    async fn missing_record_wins_over_missing_identity() {
        let store = Notes::with([note("n1", "alice")]);

        let outcome = authorize("xyz", None, Mutation::Delete, &store).await.unwrap();
        assert_eq!(outcome, GateOutcome::NotFound);
    }

    #[tokio::test]
    async fn missing_identity_on_existing_record_is_unauthenticated() {
        let store = Notes::with([note("n1", "alice")]);

        let outcome = authorize("n1", None, Mutation::Update, &store).await.unwrap();
        assert_eq!(outcome, GateOutcome::Unauthenticated);
    }

    #[tokio::test]
    async fn gate_reads_exactly_once() {
        let store = Notes::with([note("n1", "alice")]);
        let alice = UserId::new("alice");

        authorize::<Note, _>("n1", Some(&alice), Mutation::Update, &store).await.unwrap();
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
        assert_eq!(store.rows.len(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_not_an_outcome() {
        let alice = UserId::new("alice");
        let result = authorize::<Note, _>("n1", Some(&alice), Mutation::Update, &Unreachable).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[test]
    fn outcomes_map_to_errors() {
        assert!(matches!(GateOutcome::<Note>::NotFound.into_result(), Err(MutationError::NotFound)));
        assert!(matches!(
            GateOutcome::<Note>::Unauthenticated.into_result(),
            Err(MutationError::Unauthenticated)
        ));
        assert!(matches!(GateOutcome::<Note>::Forbidden.into_result(), Err(MutationError::Forbidden)));
        assert_eq!(GateOutcome::Authorized(note("n1", "a")).into_result().unwrap().body, "lunch money");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn non_owner_is_always_forbidden(owner in "[a-z0-9]{1,12}", caller in "[a-z0-9]{1,12}") {
            prop_assume!(owner != caller);
            let caller = UserId::new(caller);
            let outcome = decide(Some(note("n1", &owner)), Some(&caller));
            prop_assert_eq!(outcome, GateOutcome::Forbidden);
        }

        #[test]
        fn owner_is_always_authorized(owner in "\\PC{1,24}") {
            let record = note("n1", &owner);
            let caller = UserId::new(owner.clone());
            let outcome = decide(Some(record.clone()), Some(&caller));
            prop_assert_eq!(outcome, GateOutcome::Authorized(record));
        }

        #[test]
        fn absent_record_is_always_not_found(caller in proptest::option::of("[a-z0-9]{1,12}")) {
            let caller = caller.map(UserId::new);
            let outcome = decide::<Note>(None, caller.as_ref());
            prop_assert_eq!(outcome, GateOutcome::NotFound);
        }

        #[test]
        fn absent_identity_on_existing_record_is_unauthenticated(owner in "[a-z0-9]{1,12}") {
            let outcome = decide(Some(note("n1", &owner)), None);
            prop_assert_eq!(outcome, GateOutcome::Unauthenticated);
        }

        #[test]
        fn decision_is_repeatable(
            owner in "[a-z]{1,4}",
            caller in proptest::option::of("[a-z]{1,4}"),
            exists in any::<bool>(),
        ) {
            let caller = caller.map(UserId::new);
            let record = exists.then(|| note("n1", &owner));
            let first = decide(record.clone(), caller.as_ref());
            let second = decide(record, caller.as_ref());
            prop_assert_eq!(first, second);
        }
    }
}
