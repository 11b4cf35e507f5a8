use anyhow::Result;
use geopin::core::types::location_key::display_label;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Location keys like "north_carolina-usa"
	#[arg(num_args = 1.., required = true)]
	pub keys: Vec<String>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	for key in &arguments.keys {
		println!("{}", display_label(key));
	}
	Ok(())
}
