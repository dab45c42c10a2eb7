//! Property tests for change inversion, record round trips and the
//! command manager's commit/reset guarantees.

use proptest::prelude::*;
use serde_json::{json, Value};
use topicsync_change::{Change, ChangeRecord, ValueType, ID_FIELD};
use topicsync_command::{ChangeCommand, CommandManager, CommandRecord};
use topicsync_testkit::prelude::*;

fn without_id(change: &Change) -> ChangeRecord {
    let mut map = change.to_record().into_map();
    map.remove(ID_FIELD);
    ChangeRecord::from(map)
}

fn script_fixture(items: Value) -> TopicFixture {
    TopicFixture::new()
        .with_topic("count", ValueType::Int)
        .with_value("items", ValueType::Collection, items)
}

fn step_command(fixture: &TopicFixture, step: &ScriptStep) -> ChangeCommand {
    match step {
        ScriptStep::SetCount(n) => fixture.set("count", ValueType::Int, *n),
        ScriptStep::Append(item) => fixture.append("items", item.clone()),
        ScriptStep::Remove(item) => fixture.remove("items", item.clone()),
    }
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn decoded_change_behaves_like_original((change, value) in change_with_value_strategy()) {
        let mut original = change;
        let mut decoded = Change::from_record(original.to_record()).unwrap();
        prop_assert_eq!(&decoded, &original);

        match (original.apply(&value), decoded.apply(&value)) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(&a, &b);
                let mut inv_a = original.inverse().unwrap();
                let mut inv_b = decoded.inverse().unwrap();
                prop_assert_eq!(without_id(&inv_a), without_id(&inv_b));
                prop_assert_eq!(inv_a.apply(&a).unwrap(), inv_b.apply(&b).unwrap());
            }
            (Err(a), Err(b)) => {
                prop_assert!(a.is_validation());
                prop_assert!(b.is_validation());
            }
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn full_replace_inverse_law((value_type, v, w) in value_pair_strategy()) {
        let mut set = Change::set(value_type, w.clone());
        let applied = set.apply(&v).unwrap();
        prop_assert_eq!(&applied, &w);

        let mut inverse = set.inverse().unwrap();
        prop_assert_eq!(inverse.apply(&applied).unwrap(), v);
    }

    #[test]
    fn remove_undoes_append(v in collection_strategy(), x in item_strategy()) {
        let grown = Change::append(x.clone()).apply(&v).unwrap();
        let restored = Change::remove(x).apply(&grown).unwrap();
        prop_assert!(ValueType::Collection.values_equal(&restored, &v));
    }

    #[test]
    fn append_undoes_remove(v in collection_strategy(), x in item_strategy()) {
        let present = v.as_array().unwrap().contains(&x);
        let mut remove = Change::remove(x.clone());
        match remove.apply(&v) {
            Ok(shrunk) => {
                prop_assert!(present);
                let restored = remove.inverse().unwrap().apply(&shrunk).unwrap();
                prop_assert!(ValueType::Collection.values_equal(&restored, &v));
            }
            Err(e) => {
                prop_assert!(!present);
                prop_assert!(e.is_validation());
            }
        }
    }

    #[test]
    fn reset_restores_state_before_recording(
        start in collection_strategy(),
        script in script_strategy(0, 24),
    ) {
        let fixture = script_fixture(start.clone());
        let mut manager = CommandManager::new();

        manager.start_recording().unwrap();
        for step in &script {
            // absent removes are rejected and never buffered
            let _ = manager.add(step_command(&fixture, step));
        }
        manager.stop_recording();
        manager.reset().unwrap();

        prop_assert!(manager.is_empty());
        prop_assert_eq!(fixture.value("count"), json!(0));
        prop_assert!(ValueType::Collection.values_equal(&fixture.value("items"), &start));
    }

    #[test]
    fn committed_batch_replays_to_same_state(
        start in collection_strategy(),
        script in script_strategy(0, 24),
    ) {
        let local = script_fixture(start.clone());
        let mut manager = CommandManager::new();
        {
            let mut session = manager.record(false).unwrap();
            for step in &script {
                let _ = session.add(step_command(&local, step));
            }
        }
        let batch: Vec<CommandRecord> = manager.commit().iter().map(|c| c.to_record()).collect();
        prop_assert!(manager.commit().is_empty());

        let text = serde_json::to_string(&batch).unwrap();
        let remote = script_fixture(start);
        for record in serde_json::from_str::<Vec<CommandRecord>>(&text).unwrap() {
            ChangeCommand::from_record(record, remote.resolver())
                .unwrap()
                .execute()
                .unwrap();
        }

        prop_assert_eq!(remote.registry.snapshot(), local.registry.snapshot());
    }
}

proptest! {
    #![proptest_config(PropTestConfig::thorough().to_proptest_config())]

    #[test]
    fn float_set_survives_json_text(old in float_strategy(), new in float_strategy()) {
        let local = TopicFixture::new().with_value("ratio", ValueType::Float, json!(old));
        let mut manager = CommandManager::new();
        {
            let mut session = manager.record(false).unwrap();
            session.add(local.set("ratio", ValueType::Float, new)).unwrap();
        }
        let batch = manager.commit();

        let records: Vec<CommandRecord> = batch.iter().map(|c| c.to_record()).collect();
        let text = serde_json::to_string(&records).unwrap();
        let received: Vec<CommandRecord> = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(&received, &records);

        let decoded = Change::from_record(received[0].change.clone()).unwrap();
        prop_assert_eq!(&decoded, batch[0].change());

        let remote = TopicFixture::new().with_value("ratio", ValueType::Float, json!(old));
        let mut cmd = ChangeCommand::from_record(received[0].clone(), remote.resolver()).unwrap();
        cmd.execute().unwrap();
        prop_assert_eq!(remote.value("ratio"), local.value("ratio"));
        prop_assert_eq!(remote.value("ratio").as_f64().map(f64::to_bits), Some(new.to_bits()));

        // the pre-image read back from text restores the exact bits
        let restored = decoded.inverse().unwrap().apply(&json!(new)).unwrap();
        prop_assert_eq!(restored.as_f64().map(f64::to_bits), Some(old.to_bits()));
    }
}
