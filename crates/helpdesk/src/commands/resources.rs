//! Handlers shared by organizations, groups, brands, topics, and job
//! statuses.

use helpdesk_core::{EntityApi, EntityId, Lookup};

use crate::cli::{GlobalOpts, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// `name` is the singular resource name used in messages (`"group"`),
/// `command` the top-level subcommand it lives under (`"groups"`).
pub fn handle(
    api: &EntityApi,
    args: ResourceArgs,
    global: &GlobalOpts,
    name: &str,
    command: &str,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::List(list) => {
            let params = util::list_params(&list);
            let results = api.list(&util::borrow_params(&params))?;
            let found = util::collect(results, &list)?;
            output::print_output(&util::render_entities(&found, global), global.quiet);
            Ok(())
        }

        ResourceCommand::Get { id } => {
            let found = api
                .get(EntityId::from(id.as_str()))
                .and_then(Lookup::collect_all)
                .map_err(|e| CliError::lookup(e, name, &id, &format!("{command} list")))?;
            output::print_output(&util::show(&found, global), global.quiet);
            Ok(())
        }

        ResourceCommand::ShowMany { ids } => {
            let found = api.get_many(util::parse_ids(&ids))?.collect_all()?;
            output::print_output(&util::render_entities(&found, global), global.quiet);
            Ok(())
        }

        ResourceCommand::Delete { ids } => {
            util::ensure_confirmed(global, &format!("{command} delete"))?;
            let ids = util::parse_ids(&ids);
            api.delete_ids(&ids)?;
            util::report_deleted(ids.len(), name, global);
            Ok(())
        }
    }
}

/// Progress of a background job. Never cached, so every call is fresh.
pub fn job_status(api: &EntityApi, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let found = api
        .get(EntityId::from(id))
        .and_then(Lookup::collect_all)
        .map_err(|e| CliError::lookup(e, "job status", id, "tickets create --from-file"))?;
    output::print_output(&util::show(&found, global), global.quiet);
    Ok(())
}
