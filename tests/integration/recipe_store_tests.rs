//! Recipe CRUD through the station's command port.

use feedmix::adapters::recipe_store::RECIPE_NAMESPACE;
use feedmix::app::commands::AppCommand;
use feedmix::app::ports::CommandHandler;
use feedmix::app::replies::AppReply;
use feedmix::error::{ConflictError, Error, ValidationError};
use feedmix::recipe::Recipe;

use crate::mock_hw::{MemoryStore, TestStation, mix1, station, stepping};

fn ack(reply: AppReply) -> String {
    match reply {
        AppReply::Ack { message } => message,
        other => panic!("expected ack, got {other:?}"),
    }
}

fn names(st: &TestStation) -> Vec<String> {
    match st.dispatch(AppCommand::ListRecipes).unwrap() {
        AppReply::Recipes(list) => list.into_iter().map(|r| r.name).collect(),
        other => panic!("expected recipe list, got {other:?}"),
    }
}

#[test]
fn create_get_list_delete() {
    let st = station(stepping(20.0), MemoryStore::new());

    let msg = ack(st
        .dispatch(AppCommand::CreateRecipe { recipe: mix1() })
        .unwrap());
    assert_eq!(msg, "Recipe 'Mix1' created.");

    match st
        .dispatch(AppCommand::GetRecipe {
            name: "Mix1".into(),
        })
        .unwrap()
    {
        AppReply::Recipe(r) => {
            assert_eq!(r.ingredients, mix1().ingredients);
            assert!(r.created_at.is_some());
        }
        other => panic!("expected recipe, got {other:?}"),
    }

    assert_eq!(names(&st), vec!["Mix1"]);

    let msg = ack(st
        .dispatch(AppCommand::DeleteRecipe {
            name: "Mix1".into(),
        })
        .unwrap());
    assert_eq!(msg, "Recipe 'Mix1' deleted.");
    assert!(names(&st).is_empty());
}

#[test]
fn recipes_are_pretty_json_documents_keyed_by_name() {
    let store = MemoryStore::new();
    let st = station(stepping(20.0), store.clone());
    st.dispatch(AppCommand::CreateRecipe { recipe: mix1() })
        .unwrap();

    let raw = String::from_utf8(store.raw(RECIPE_NAMESPACE, "Mix1").unwrap()).unwrap();
    assert!(raw.contains('\n'));
    let parsed: Recipe = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.name, "Mix1");
}

#[test]
fn duplicate_and_missing_names() {
    let st = station(stepping(20.0), MemoryStore::new());
    st.dispatch(AppCommand::CreateRecipe { recipe: mix1() })
        .unwrap();

    assert_eq!(
        st.dispatch(AppCommand::CreateRecipe { recipe: mix1() })
            .unwrap_err(),
        Error::Conflict(ConflictError::RecipeExists("Mix1".into()))
    );
    assert_eq!(
        st.dispatch(AppCommand::GetRecipe {
            name: "Nope".into()
        })
        .unwrap_err(),
        Error::NotFound("Nope".into())
    );
}

#[test]
fn invalid_percentages_are_rejected() {
    let st = station(stepping(20.0), MemoryStore::new());
    let bad = Recipe::new("Heavy", [("corn", 80.0), ("alfalfa", 40.0)]);
    let err = st
        .dispatch(AppCommand::CreateRecipe { recipe: bad })
        .unwrap_err();
    assert_eq!(err, Error::Validation(ValidationError::PercentageSum(120.0)));
}

#[test]
fn rename_via_update() {
    let st = station(stepping(20.0), MemoryStore::new());
    st.dispatch(AppCommand::CreateRecipe { recipe: mix1() })
        .unwrap();

    let renamed = Recipe::new("Mix1b", [("corn", 55.0), ("alfalfa", 45.0)]);
    let msg = ack(st
        .dispatch(AppCommand::UpdateRecipe {
            name: "Mix1".into(),
            recipe: renamed,
        })
        .unwrap());
    assert_eq!(msg, "Recipe 'Mix1b' updated.");
    assert_eq!(names(&st), vec!["Mix1b"]);
}

#[test]
fn stop_uses_persisted_recipe_not_start_body() {
    let store = MemoryStore::new();
    let st = station(stepping(25.0), store.clone());
    st.dispatch(AppCommand::CreateRecipe { recipe: mix1() })
        .unwrap();

    // Session opened with a body that differs from what is stored.
    let body = Recipe::new("Mix1", [("corn", 10.0), ("alfalfa", 90.0)]);
    st.dispatch(AppCommand::Start {
        recipe: Some(body),
        total_weight: 100.0,
    })
    .unwrap();
    for _ in 0..4 {
        st.dispatch(AppCommand::Weight).unwrap();
    }
    st.dispatch(AppCommand::Stop).unwrap();

    let bytes = store
        .raw(feedmix::ledger::LEDGER_NAMESPACE, feedmix::ledger::LEDGER_KEY)
        .unwrap();
    let doc: feedmix::ledger::LedgerDocument = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc.total_usage["corn"].total_kg, 60.0);
    assert_eq!(doc.total_usage["alfalfa"].total_kg, 40.0);
}
