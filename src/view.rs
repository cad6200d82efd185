//! Display targets the adapter writes into.
//!
//! In the browser these are DOM nodes; in the terminal they are stdout
//! lines. All methods take `&self`: targets are written from a single
//! event loop, so implementations use interior mutability.

use std::rc::Rc;
use std::sync::Arc;

/// A node whose text content is replaced wholesale.
pub trait TextTarget {
    fn set_text(&self, text: &str);
}

/// A container that starts hidden and is revealed once it has content.
pub trait Region {
    fn show(&self);
}

/// Blocking user dialogs.
pub trait Dialogs {
    /// Show `message` and wait until the user dismisses it.
    fn alert(&self, message: &str);

    /// Ask a yes/no question. `false` means the user declined.
    fn confirm(&self, message: &str) -> bool;
}

// Shared handles let the caller keep reading a target after handing it to
// the adapter.
macro_rules! forward_through {
    ($ptr:ident) => {
        impl<T: TextTarget + ?Sized> TextTarget for $ptr<T> {
            fn set_text(&self, text: &str) {
                (**self).set_text(text)
            }
        }

        impl<T: Region + ?Sized> Region for $ptr<T> {
            fn show(&self) {
                (**self).show()
            }
        }

        impl<T: Dialogs + ?Sized> Dialogs for $ptr<T> {
            fn alert(&self, message: &str) {
                (**self).alert(message)
            }

            fn confirm(&self, message: &str) -> bool {
                (**self).confirm(message)
            }
        }
    };
}

forward_through!(Rc);
forward_through!(Arc);
