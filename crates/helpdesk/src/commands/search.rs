//! Search command handler.

use helpdesk_core::HelpdeskClient;

use crate::cli::{GlobalOpts, SearchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// Results mix kinds, so they render with the generic row.
pub fn handle(client: &HelpdeskClient, args: SearchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let query = args.query.join(" ");
    let params = util::list_params(&args.list);
    let results = client.search(&query, &util::borrow_params(&params))?;

    if let Some(total) = results.total() {
        tracing::info!(total, query = %query, "search matched");
    }

    let found = util::collect(results, &args.list)?;
    output::print_output(&util::render_entities(&found, global), global.quiet);
    Ok(())
}
