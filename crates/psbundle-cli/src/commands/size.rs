use crate::cli::SizeArgs;
use crate::context::{AppContext, CliResult};
use crate::output::render_size;

pub(crate) fn handle_size(ctx: &AppContext, args: &SizeArgs) -> CliResult<()> {
    println!("{}", render_size(args.bytes, args.precision, ctx.output)?);
    Ok(())
}
