use clap::Subcommand;
use pass_core::enums::Gender;

/// User directory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user.
    Add {
        name: String,
        #[arg(long)]
        age: u32,
        /// male|m or female|f
        #[arg(long)]
        gender: Gender,
    },
    /// List users.
    List,
    /// Get a user by ID.
    Get { id: String },
    /// Change a user's age.
    SetAge {
        id: String,
        #[arg(long)]
        age: u32,
    },
    /// Delete a user with their record and history.
    Remove { id: String },
}
