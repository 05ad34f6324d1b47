mod composer;
mod contribution;
mod join;
mod shared;

pub use composer::{ComposeOptions, Composer, ComposerBuilder};
pub use contribution::{Contribution, ContributionResult};
pub use join::join_contributions;
pub use shared::SharedComposer;
