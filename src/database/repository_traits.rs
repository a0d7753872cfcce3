use crate::middleware::error::AppResult;

pub trait EntityWithId {
    fn id_str(&self) -> &str;
}

/// Change applied to one stored record while the store is locked.
/// An `Err` leaves the stored record untouched.
pub type Mutation<E> = Box<dyn FnOnce(&mut E) -> AppResult<()> + Send>;

pub fn mutation<E, F>(f: F) -> Mutation<E>
where
    F: FnOnce(&mut E) -> AppResult<()> + Send + 'static,
{
    Box::new(f)
}
