use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;

/// Thin adapter over the `fake` crate for the person fields we need.
pub struct FakePerson;

impl FakePerson {
    pub fn first_name<R: Rng>(rng: &mut R) -> String {
        FirstName().fake_with_rng(rng)
    }

    pub fn last_name<R: Rng>(rng: &mut R) -> String {
        LastName().fake_with_rng(rng)
    }

    pub fn email<R: Rng>(rng: &mut R) -> String {
        SafeEmail().fake_with_rng(rng)
    }
}
