//! Property tests for the merge engine.

use proptest::prelude::*;

use rostra_core::{Dataset, PatchField, PatchSet, WorkerPatch, WorkerRecord, merge};

fn arb_worker(id: u32) -> impl Strategy<Value = WorkerRecord> {
    (
        "[A-Za-z ]{1,12}",
        proptest::option::of("[A-Za-z]{1,8}"),
        0u8..=50,
        any::<bool>(),
    )
        .prop_map(move |(name, specialty, rating_tenths, verified)| {
            let mut w = WorkerRecord::empty(id);
            w.name = name;
            w.role = "Cleaner".to_string();
            w.specialty = specialty;
            w.rating = f64::from(rating_tenths) / 10.0;
            w.verified = verified;
            w
        })
}

fn arb_snapshot() -> impl Strategy<Value = Dataset> {
    proptest::collection::btree_set(1u32..20, 0..8).prop_flat_map(|ids| {
        let workers: Vec<_> = ids.into_iter().map(arb_worker).collect();
        workers.prop_map(|workers| {
            let mut ds = Dataset::fallback();
            ds.workers = workers;
            ds
        })
    })
}

fn arb_field<T: std::fmt::Debug + Clone>(
    value: impl Strategy<Value = T>,
) -> impl Strategy<Value = PatchField<T>> {
    prop_oneof![
        2 => Just(PatchField::Absent),
        1 => Just(PatchField::Clear),
        2 => value.prop_map(PatchField::Set),
    ]
}

fn arb_patch() -> impl Strategy<Value = WorkerPatch> {
    (
        arb_field("[A-Za-z ]{1,12}".prop_map(String::from)),
        arb_field("[A-Za-z]{1,8}".prop_map(String::from)),
        arb_field((0u8..=50).prop_map(|t| f64::from(t) / 10.0)),
        arb_field(any::<bool>()),
    )
        .prop_map(|(name, specialty, rating, featured)| WorkerPatch {
            name,
            specialty,
            rating,
            featured,
            ..Default::default()
        })
}

fn arb_patch_set() -> impl Strategy<Value = PatchSet> {
    (
        proptest::collection::btree_map(1u32..30, arb_patch(), 0..6),
        proptest::collection::btree_set(1u32..30, 0..4),
    )
        .prop_map(|(entries, deleted)| {
            let mut set = PatchSet::new();
            for (id, patch) in entries {
                set.set(id, patch);
            }
            for id in deleted {
                set.tombstone(id);
            }
            set
        })
}

proptest! {
    #[test]
    fn merge_is_deterministic(snapshot in arb_snapshot(), patches in arb_patch_set()) {
        prop_assert_eq!(merge(&snapshot, &patches), merge(&snapshot, &patches));
    }

    #[test]
    fn merge_is_idempotent(snapshot in arb_snapshot(), patches in arb_patch_set()) {
        let view = merge(&snapshot, &patches);
        let again = merge(&view.to_dataset(), &PatchSet::new());
        prop_assert_eq!(again, view);
    }

    #[test]
    fn patched_fields_win_unmentioned_fields_retained(
        snapshot in arb_snapshot(),
        patches in arb_patch_set(),
    ) {
        let view = merge(&snapshot, &patches);
        for base in &snapshot.workers {
            let Some(patch) = patches.get(base.id) else { continue };
            let Some(merged) = view.get(base.id) else { continue };

            match &patch.name {
                PatchField::Set(v) => prop_assert_eq!(&merged.name, v),
                // Clear on a required field preserves the base value.
                PatchField::Absent | PatchField::Clear => {
                    prop_assert_eq!(&merged.name, &base.name)
                }
            }
            match &patch.specialty {
                PatchField::Set(v) => prop_assert_eq!(merged.specialty.as_ref(), Some(v)),
                PatchField::Clear => prop_assert!(merged.specialty.is_none()),
                PatchField::Absent => prop_assert_eq!(&merged.specialty, &base.specialty),
            }
        }
    }

    #[test]
    fn tombstoned_ids_never_surface(snapshot in arb_snapshot(), patches in arb_patch_set()) {
        let view = merge(&snapshot, &patches);
        for id in &patches.deleted {
            prop_assert!(!view.contains(*id));
        }
    }

    #[test]
    fn snapshot_order_is_preserved(snapshot in arb_snapshot(), patches in arb_patch_set()) {
        let view = merge(&snapshot, &patches);
        let surviving: Vec<u32> = snapshot
            .workers
            .iter()
            .map(|w| w.id)
            .filter(|id| !patches.is_deleted(*id))
            .collect();
        let merged_prefix: Vec<u32> = view
            .workers
            .iter()
            .take(surviving.len())
            .map(|w| w.id)
            .collect();
        prop_assert_eq!(merged_prefix, surviving);
    }
}
