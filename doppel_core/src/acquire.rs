use std::{error::Error, marker::PhantomData};

/// Boxed source error carried by [`AcquisitionError::Failed`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Produces the payload of a new snapshot, typically by scanning some external source.
///
/// `acquire` is only ever called by the scheduler that owns the acquirer, one call at a time. It
/// may take arbitrarily long. It must not touch the publisher: the payload is handed back by value
/// and published by the scheduler once it is complete.
pub trait Acquirer {
    type Output;

    fn acquire(&mut self) -> Result<Self::Output, AcquisitionError>;
}

impl<A: Acquirer + ?Sized> Acquirer for Box<A> {
    type Output = A::Output;

    fn acquire(&mut self) -> Result<Self::Output, AcquisitionError> {
        (**self).acquire()
    }
}

/// Adapts a closure into an [`Acquirer`].
///
/// ```rust
/// # use doppel_core::acquire::{acquirer_from_fn, Acquirer, AcquisitionError};
/// let mut reads = 0u32;
/// let mut acquirer = acquirer_from_fn(move || {
///     reads += 1;
///     Ok::<_, AcquisitionError>(vec![reads; 4])
/// });
///
/// assert_eq!(vec![1, 1, 1, 1], acquirer.acquire().unwrap());
/// ```
pub fn acquirer_from_fn<T, F>(f: F) -> FnAcquirer<T, F>
where
    F: FnMut() -> Result<T, AcquisitionError>,
{
    FnAcquirer {
        inner: f,
        phantom: PhantomData,
    }
}

/// See [`acquirer_from_fn`].
pub struct FnAcquirer<T, F> {
    inner: F,
    phantom: PhantomData<fn() -> T>,
}

impl<T, F> Acquirer for FnAcquirer<T, F>
where
    F: FnMut() -> Result<T, AcquisitionError>,
{
    type Output = T;

    fn acquire(&mut self) -> Result<T, AcquisitionError> {
        (self.inner)()
    }
}

/// Error returned when a cycle could not build a snapshot. The cycle is skipped and the previously
/// published snapshot stays current; readers never see this error.
#[derive(thiserror::Error, Debug)]
pub enum AcquisitionError {
    #[error("acquisition failed: {0}")]
    Failed(#[source] BoxError),
    #[error("acquisition failed: {0}")]
    Message(String),
    #[error("acquirer panicked: {0}")]
    Panicked(String),
}

impl AcquisitionError {
    /// Wraps any error raised while scanning the source.
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self::Failed(error.into())
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}
