//! Model-checking harness for the engine.
//!
//! Applies [`UserOp`]s to a real [`JsonDb`] and to a plain in-memory model
//! side by side, asserting after every step that both agree.

use crate::fixtures::User;
use crate::generators::UserOp;
use rowdb_core::{CoreError, JsonDb};

/// A test harness that mirrors the `User` table in a model.
pub struct IntegrationHarness {
    /// The database under test.
    pub db: JsonDb,
    /// Expected rows in expected order.
    model: Vec<User>,
    /// Expected next generated identifier.
    next_id: u64,
    /// Identifiers handed out by `save`, in order.
    issued: Vec<u64>,
}

impl IntegrationHarness {
    /// Creates a harness whose model starts from the database's current state.
    pub fn new(db: JsonDb) -> Self {
        let model = db.find_all::<User>().expect("Failed to read users");
        let next_id = db
            .database()
            .id_generator("User")
            .expect("Failed to read generator");

        Self {
            db,
            model,
            next_id,
            issued: Vec::new(),
        }
    }

    /// Identifiers assigned by `save` so far, in order.
    pub fn issued_ids(&self) -> &[u64] {
        &self.issued
    }

    /// The expected rows.
    pub fn model(&self) -> &[User] {
        &self.model
    }

    /// Applies one operation to both the database and the model.
    pub fn apply(&mut self, op: &UserOp) {
        match op {
            UserOp::Save(user) => {
                let mut user = user.clone();
                let id = self.db.save(&mut user).expect("Failed to save user");
                assert_eq!(id, self.next_id, "save must hand out the generator value");
                assert_eq!(user.id, Some(id));
                self.next_id += 1;
                self.issued.push(id);
                self.model.push(user);
            }
            UserOp::Update { target, age } => {
                if self.model.is_empty() {
                    return;
                }
                let index = target.index(self.model.len());
                self.model[index].age = *age;
                self.db
                    .update(&self.model[index])
                    .expect("Failed to update user");
            }
            UserOp::Remove(target) => {
                if self.model.is_empty() {
                    return;
                }
                let user = self.model.remove(target.index(self.model.len()));
                let removed = self
                    .db
                    .remove::<User>(user.id.expect("model rows have ids"))
                    .expect("Failed to remove user");
                assert!(removed);
            }
            UserOp::RemoveId(id) => {
                let position = self.model.iter().position(|u| u.id == Some(*id));
                if let Some(position) = position {
                    self.model.remove(position);
                }
                let removed = self.db.remove::<User>(*id).expect("Failed to remove id");
                assert_eq!(removed, position.is_some());
            }
            UserOp::Replace(user) => {
                let id = user.id.expect("replace users carry ids");
                let position = self.model.iter().position(|u| u.id == Some(id));
                match position {
                    Some(position) => self.model[position] = user.clone(),
                    None => self.model.push(user.clone()),
                }
                self.next_id = self.next_id.max(id + 1);
                let overwritten = self.db.replace(user).expect("Failed to replace user");
                assert_eq!(overwritten, position.is_some());
            }
            UserOp::FindOne(id) => {
                let expected = self.model.iter().find(|u| u.id == Some(*id)).cloned();
                let actual = self.db.find_one::<User>(*id).expect("Failed to find user");
                assert_eq!(actual, expected);
            }
        }
    }

    /// Asserts that the database matches the model.
    pub fn verify(&self) {
        let actual = self.db.find_all::<User>().expect("Failed to read users");
        assert_eq!(actual, self.model, "row order or content diverged");

        let generator = self
            .db
            .database()
            .id_generator("User")
            .expect("Failed to read generator");
        assert_eq!(generator, self.next_id, "generator diverged");

        for user in &actual {
            assert!(user.id.expect("stored rows have ids") < generator);
        }
    }

    /// Asserts that saving a user with an identifier is rejected and changes nothing.
    pub fn verify_manual_save_rejected(&self, user: &User) {
        let before = self.db.find_all::<User>().expect("Failed to read users");
        let mut user = user.clone();

        match self.db.save(&mut user) {
            Err(CoreError::ManualIdentifierNotAllowed { id, .. }) => {
                assert_eq!(Some(id), user.id);
            }
            other => panic!("expected ManualIdentifierNotAllowed, got {other:?}"),
        }

        let after = self.db.find_all::<User>().expect("Failed to read users");
        assert_eq!(before, after);
    }
}
