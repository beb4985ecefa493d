use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pass user`.
pub fn handle(
    action: &UserCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Add { name, age, gender } => {
            let user = ctx.service.create_user(name, *age, *gender)?;
            output(
                &json!({ "user": user, "age_group": user.age_group() }),
                flags.format,
            )
        }
        UserCommands::List => {
            let users = ctx.service.list_users()?;
            output(&json!({ "count": users.len(), "users": users }), flags.format)
        }
        UserCommands::Get { id } => {
            let user = ctx.service.get_user(id)?;
            output(
                &json!({ "user": user, "age_group": user.age_group() }),
                flags.format,
            )
        }
        UserCommands::SetAge { id, age } => {
            let user = ctx.service.update_user_age(id, *age)?;
            output(
                &json!({ "user": user, "age_group": user.age_group() }),
                flags.format,
            )
        }
        UserCommands::Remove { id } => {
            ctx.service.delete_user(id)?;
            output(&json!({ "removed": id }), flags.format)
        }
    }
}
