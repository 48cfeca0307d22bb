//! Callable cloning for test isolation.
//!
//! kagemusha-core provides [`Callable`], an invocable value carrying
//! attached metadata and a delegating behavior set, and a cloning operation
//! ([`Callable::isolate_with`]) that produces an independent stand-in:
//! identical when invoked, snapshotting the metadata shallowly, and
//! overridable without mutating the original. Test suites use it to stub
//! shared callables without cross-test pollution.
//!
//! ```
//! use kagemusha_core::{Augmentation, Callable};
//!
//! let shared: Callable<(), (), String> = Callable::builder(|_, _| "called".to_string())
//!     .meta("tag", "shared".to_string())
//!     .behavior("describe", |_, _| "base".to_string())
//!     .build();
//!
//! let double = shared.isolate_with(
//!     Augmentation::new().set("describe", |_, _| "override".to_string()),
//! );
//!
//! assert_eq!(double.call(&mut (), ()), "called");
//! assert_eq!(double.metadata().get_as::<String>("tag").unwrap(), "shared");
//! assert_eq!(double.invoke_behavior("describe", &mut (), ()).unwrap(), "override");
//! assert_eq!(shared.invoke_behavior("describe", &mut (), ()).unwrap(), "base");
//! ```

pub mod behavior;
pub mod callable;
pub mod error;
pub mod metadata;

pub use behavior::{Augmentation, Behavior, BehaviorSet};
pub use callable::{Callable, CallableBuilder};
pub use error::{Error, Result};
pub use metadata::{MetaValue, Metadata};
