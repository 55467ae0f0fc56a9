//! Behavioural checks every [`PersonRepository`] must pass.
//!
//! Each function takes a freshly opened, empty repository and panics on the
//! first violated expectation. Backends call them from their own test
//! modules, so the contract is written once and exercised per backend.

use crate::{Error, PersonCreate, PersonRepository, PersonUpdate, model::Person};

fn input(first: &str, last: &str, email: &str) -> PersonCreate {
  PersonCreate::new(first, last, email)
}

fn located(first: &str, last: &str, email: &str, city: &str, state: &str) -> PersonCreate {
  PersonCreate {
    city: Some(city.into()),
    state: Some(state.into()),
    ..input(first, last, email)
  }
}

fn first_names(people: &[Person]) -> Vec<&str> {
  people.iter().map(|p| p.first_name.as_str()).collect()
}

// ─── CRUD ────────────────────────────────────────────────────────────────────

pub async fn create_then_get_round_trips<R: PersonRepository>(repo: &R) {
  let created = repo
    .create(PersonCreate {
      phone: Some("555-0100".into()),
      address: Some("1 Main St".into()),
      city: Some("Austin".into()),
      state: Some("TX".into()),
      zip_code: Some("73301".into()),
      ..input("John", "Smith", "john@example.com")
    })
    .await
    .expect("create");

  assert_eq!(created.first_name, "John");
  assert_eq!(created.zip_code.as_deref(), Some("73301"));

  let id = created.id.to_string();
  let fetched = repo.get(&id).await.expect("get").expect("person exists");
  assert_eq!(fetched, created);
  assert_eq!(fetched.id.to_string(), id);
}

pub async fn create_without_optionals_stores_none<R: PersonRepository>(repo: &R) {
  let created = repo
    .create(PersonCreate {
      phone: Some(String::new()),
      ..input("Jane", "Doe", "jane@example.com")
    })
    .await
    .expect("create");
  assert_eq!(created.phone, None);

  let fetched = repo
    .get(&created.id.to_string())
    .await
    .expect("get")
    .expect("person exists");
  assert_eq!(fetched.phone, None);
  assert_eq!(fetched.city, None);
  assert_eq!(fetched, created);
}

pub async fn ids_are_distinct<R: PersonRepository>(repo: &R) {
  let a = repo.create(input("A", "One", "a@example.com")).await.expect("create a");
  let b = repo.create(input("B", "Two", "b@example.com")).await.expect("create b");
  assert_ne!(a.id, b.id);
}

pub async fn duplicate_email_is_rejected<R: PersonRepository>(repo: &R) {
  repo
    .create(input("John", "Smith", "dup@example.com"))
    .await
    .expect("first create");

  let err = repo
    .create(input("Johnny", "Smithers", "dup@example.com"))
    .await
    .expect_err("second create must fail");
  assert!(matches!(err, Error::DuplicateEmail), "got {err:?}");
}

pub async fn update_to_taken_email_is_rejected<R: PersonRepository>(repo: &R) {
  repo
    .create(input("John", "Smith", "john@example.com"))
    .await
    .expect("create john");
  let joanna = repo
    .create(input("Joanna", "Lee", "joanna@example.com"))
    .await
    .expect("create joanna");

  let patch = PersonUpdate { email: Some("john@example.com".into()), ..Default::default() };
  let err = repo
    .update(&joanna.id.to_string(), patch)
    .await
    .expect_err("update must fail");
  assert!(matches!(err, Error::DuplicateEmail), "got {err:?}");

  let unchanged = repo
    .get(&joanna.id.to_string())
    .await
    .expect("get")
    .expect("joanna exists");
  assert_eq!(unchanged.email, "joanna@example.com");
}

pub async fn invalid_identifier_is_rejected<R: PersonRepository>(repo: &R) {
  for bad in ["abc", "not-an-id", ""] {
    assert!(
      matches!(repo.get(bad).await, Err(Error::InvalidIdentifier(_))),
      "get({bad:?})"
    );
    assert!(
      matches!(
        repo.update(bad, PersonUpdate { city: Some("X".into()), ..Default::default() }).await,
        Err(Error::InvalidIdentifier(_))
      ),
      "update({bad:?})"
    );
    assert!(
      matches!(repo.delete(bad).await, Err(Error::InvalidIdentifier(_))),
      "delete({bad:?})"
    );
  }
}

/// `missing_id` must be well formed for the backend but never assigned.
pub async fn missing_identifier_is_not_found<R: PersonRepository>(repo: &R, missing_id: &str) {
  assert!(repo.get(missing_id).await.expect("get").is_none());
  let patch = PersonUpdate { first_name: Some("Ghost".into()), ..Default::default() };
  assert!(repo.update(missing_id, patch).await.expect("update").is_none());
  assert!(!repo.delete(missing_id).await.expect("delete"));
}

pub async fn update_merges_present_fields<R: PersonRepository>(repo: &R) {
  let created = repo
    .create(located("John", "Smith", "john@example.com", "Austin", "TX"))
    .await
    .expect("create");
  let id = created.id.to_string();

  let patch = PersonUpdate {
    last_name: Some("Smythe".into()),
    phone: Some("555-0199".into()),
    city: Some(String::new()),
    ..Default::default()
  };
  let updated = repo.update(&id, patch).await.expect("update").expect("exists");

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.first_name, "John");
  assert_eq!(updated.last_name, "Smythe");
  assert_eq!(updated.phone.as_deref(), Some("555-0199"));
  assert_eq!(updated.city.as_deref(), Some("Austin"));

  let fetched = repo.get(&id).await.expect("get").expect("exists");
  assert_eq!(fetched, updated);
}

pub async fn empty_patch_field_is_noop<R: PersonRepository>(repo: &R) {
  let created = repo
    .create(input("John", "Smith", "john@example.com"))
    .await
    .expect("create");
  let id = created.id.to_string();

  let patch = PersonUpdate { first_name: Some(String::new()), ..Default::default() };
  let result = repo.update(&id, patch).await.expect("update").expect("exists");
  assert_eq!(result, created);

  let result = repo
    .update(&id, PersonUpdate::default())
    .await
    .expect("update")
    .expect("exists");
  assert_eq!(result, created);

  let fetched = repo.get(&id).await.expect("get").expect("exists");
  assert_eq!(fetched.first_name, "John");
}

pub async fn update_may_keep_own_email<R: PersonRepository>(repo: &R) {
  let created = repo
    .create(input("John", "Smith", "john@example.com"))
    .await
    .expect("create");
  let patch = PersonUpdate {
    email: Some("john@example.com".into()),
    first_name: Some("Jon".into()),
    ..Default::default()
  };
  let updated = repo
    .update(&created.id.to_string(), patch)
    .await
    .expect("update")
    .expect("exists");
  assert_eq!(updated.first_name, "Jon");
  assert_eq!(updated.email, "john@example.com");
}

pub async fn delete_removes_record<R: PersonRepository>(repo: &R) {
  let created = repo
    .create(input("John", "Smith", "john@example.com"))
    .await
    .expect("create");
  let id = created.id.to_string();

  assert!(repo.delete(&id).await.expect("first delete"));
  assert!(repo.get(&id).await.expect("get").is_none());
  assert!(!repo.delete(&id).await.expect("second delete"));

  // The email is free again once the record is gone.
  repo
    .create(input("John", "Smith", "john@example.com"))
    .await
    .expect("recreate");
}

// ─── Search ──────────────────────────────────────────────────────────────────

async fn seed_names<R: PersonRepository>(repo: &R) {
  for (first, last, email) in [
    ("John", "Smith", "john@example.com"),
    ("Mark", "Jones", "mark@example.com"),
    ("Joanna", "Lee", "joanna@example.com"),
  ] {
    repo.create(input(first, last, email)).await.expect("seed");
  }
}

pub async fn search_by_first_name_fragment<R: PersonRepository>(repo: &R) {
  seed_names(repo).await;

  let found = repo.search_by_name("jo", "").await.expect("search");
  assert_eq!(first_names(&found), ["John", "Joanna"]);

  let found = repo.search_by_name("JOANNA", "").await.expect("search");
  assert_eq!(first_names(&found), ["Joanna"]);
}

pub async fn search_by_last_name_fragment<R: PersonRepository>(repo: &R) {
  seed_names(repo).await;

  let found = repo.search_by_name("", "ONES").await.expect("search");
  assert_eq!(first_names(&found), ["Mark"]);

  let found = repo.search_by_name("jo", "mit").await.expect("search");
  assert_eq!(first_names(&found), ["John"]);

  let found = repo.search_by_name("zz", "").await.expect("search");
  assert!(found.is_empty());
}

pub async fn search_with_blank_fragments_returns_all<R: PersonRepository>(repo: &R) {
  assert!(repo.search_by_name("", "").await.expect("empty store").is_empty());

  seed_names(repo).await;
  let found = repo.search_by_name("", "  ").await.expect("search");
  assert_eq!(first_names(&found), ["John", "Mark", "Joanna"]);
}

pub async fn search_fragments_match_literally<R: PersonRepository>(repo: &R) {
  repo.create(input("Anna", "Lee", "anna@example.com")).await.expect("create");
  repo.create(input("Ann_e", "Lee", "anne@example.com")).await.expect("create");
  repo.create(input("Jo.", "Lee", "jo@example.com")).await.expect("create");

  let found = repo.search_by_name("n_", "").await.expect("search");
  assert_eq!(first_names(&found), ["Ann_e"]);

  let found = repo.search_by_name(".", "").await.expect("search");
  assert_eq!(first_names(&found), ["Jo."]);

  let found = repo.search_by_name("%", "").await.expect("search");
  assert!(found.is_empty());
}

// ─── City / state ────────────────────────────────────────────────────────────

pub async fn list_by_city_state_requires_both<R: PersonRepository>(repo: &R) {
  assert!(matches!(
    repo.list_by_city_state("", "CA").await,
    Err(Error::MissingParameter(_))
  ));
  assert!(matches!(
    repo.list_by_city_state("Austin", "").await,
    Err(Error::MissingParameter(_))
  ));
}

pub async fn list_by_city_state_matches_exactly<R: PersonRepository>(repo: &R) {
  repo
    .create(located("John", "Smith", "john@example.com", "Austin", "TX"))
    .await
    .expect("create");
  repo
    .create(located("Mark", "Jones", "mark@example.com", "Dallas", "TX"))
    .await
    .expect("create");
  repo
    .create(located("Joanna", "Lee", "joanna@example.com", "austin", "tx"))
    .await
    .expect("create");
  repo
    .create(located("Ed", "Moss", "ed@example.com", "Austin City", "TX"))
    .await
    .expect("create");
  repo.create(input("Nora", "Vale", "nora@example.com")).await.expect("create");

  let found = repo.list_by_city_state("Austin", "TX").await.expect("list");
  assert_eq!(first_names(&found), ["John", "Joanna"]);

  let found = repo.list_by_city_state("AUSTIN", "tx").await.expect("list");
  assert_eq!(first_names(&found), ["John", "Joanna"]);

  let found = repo.list_by_city_state("Boston", "MA").await.expect("list");
  assert!(found.is_empty());
}

// ─── Case folding ────────────────────────────────────────────────────────────

/// Case-insensitive matching must fold beyond ASCII, and an exact-case query
/// must always find the value it was stored with.
pub async fn matching_folds_non_ascii<R: PersonRepository>(repo: &R) {
  repo
    .create(located("Émile", "Zola", "emile@example.com", "Évry", "IDF"))
    .await
    .expect("create");
  repo
    .create(located("Emile", "Durand", "durand@example.com", "Evry", "IDF"))
    .await
    .expect("create");

  let found = repo.list_by_city_state("Évry", "IDF").await.expect("list");
  assert_eq!(first_names(&found), ["Émile"]);

  let found = repo.list_by_city_state("éVRY", "idf").await.expect("list");
  assert_eq!(first_names(&found), ["Émile"]);

  let found = repo.search_by_name("Émile", "").await.expect("search");
  assert_eq!(first_names(&found), ["Émile"]);

  let found = repo.search_by_name("éMILE", "zOLA").await.expect("search");
  assert_eq!(first_names(&found), ["Émile"]);

  let found = repo.search_by_name("MILE", "").await.expect("search");
  assert_eq!(first_names(&found), ["Émile", "Emile"]);
}
