//! User command handlers.

use tabled::Tabled;

use helpdesk_core::{
    CoreError, Entity, EntityId, HelpdeskClient, Lookup, ResultGenerator, Ticket, User,
};

use crate::cli::{GlobalOpts, ListArgs, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::{tickets, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Org")]
    organization: String,
    #[tabled(rename = "Last login")]
    last_login: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: output::opt(u.id.as_ref()),
            name: output::opt(u.name.as_ref()),
            email: output::opt(u.email.as_ref()),
            role: output::opt(u.role.as_ref()),
            organization: output::opt(u.organization_id.value()),
            last_login: output::fmt_time(u.last_login_at.as_ref()),
        }
    }
}

fn render_users(users: &[User], global: &GlobalOpts) -> String {
    output::render_list(
        util::format(global),
        users,
        |u| UserRow::from(u),
        |u| output::opt(u.id.as_ref()),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(client: &HelpdeskClient, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let api = client.users();

    match args.command {
        UsersCommand::List { role, list } => {
            let mut params = util::list_params(&list);
            if let Some(role) = role {
                params.push(("role", role));
            }
            let results = api.list(&util::borrow_params(&params))?;
            let users = util::typed::<User>(&util::collect(results, &list)?);
            output::print_output(&render_users(&users, global), global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let found = api
                .get(EntityId::from(id.as_str()))
                .and_then(Lookup::collect_all)
                .map_err(|e| CliError::lookup(e, "user", &id, "users list"))?;
            output::print_output(&util::show(&found, global), global.quiet);
            Ok(())
        }

        UsersCommand::ShowMany { ids } => {
            let found = api.get_many(util::parse_ids(&ids))?.collect_all()?;
            let users = util::typed::<User>(&found);
            output::print_output(&render_users(&users, global), global.quiet);
            Ok(())
        }

        UsersCommand::Groups { id } => {
            let results = api
                .groups(EntityId::from(id.as_str()))
                .map_err(|e| CliError::lookup(e, "user", &id, "users list"))?;
            let groups: Vec<Entity> = results.collect::<Result<_, CoreError>>()?;
            output::print_output(&util::render_entities(&groups, global), global.quiet);
            Ok(())
        }

        UsersCommand::Organizations { id } => {
            let results = api
                .organizations(EntityId::from(id.as_str()))
                .map_err(|e| CliError::lookup(e, "user", &id, "users list"))?;
            let orgs: Vec<Entity> = results.collect::<Result<_, CoreError>>()?;
            output::print_output(&util::render_entities(&orgs, global), global.quiet);
            Ok(())
        }

        UsersCommand::Requested { id, list } => {
            user_tickets(api.requested(EntityId::from(id.as_str())), &id, &list, global)
        }
        UsersCommand::Ccd { id, list } => {
            user_tickets(api.ccd(EntityId::from(id.as_str())), &id, &list, global)
        }
        UsersCommand::Assigned { id, list } => {
            user_tickets(api.assigned(EntityId::from(id.as_str())), &id, &list, global)
        }

        UsersCommand::Create { name, email, role } => {
            let user = User {
                name: Some(name),
                email,
                role,
                ..User::default()
            };
            let response = api.create(user)?;
            output::print_output(&util::render_entity(&response.entity(), global), global.quiet);
            Ok(())
        }

        UsersCommand::Delete { ids } => {
            util::ensure_confirmed(global, "users delete")?;
            let ids = util::parse_ids(&ids);
            api.delete_ids(&ids)?;
            util::report_deleted(ids.len(), "user", global);
            Ok(())
        }
    }
}

fn user_tickets(
    results: Result<ResultGenerator, CoreError>,
    id: &str,
    list: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let results = results.map_err(|e| CliError::lookup(e, "user", id, "users list"))?;
    let tickets = util::typed::<Ticket>(&util::collect(results, list)?);
    output::print_output(&tickets::render_tickets(&tickets, global), global.quiet);
    Ok(())
}
