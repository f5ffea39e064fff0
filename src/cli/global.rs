use clap::Args;

/// Global arguments that apply to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Settings file to use instead of the built-in/user/local chain
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Suppress informational notices
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Maximum input size in bytes (0 = unlimited)
    #[arg(long, global = true, default_value = "1048576")]
    pub max_size: usize,

    /// Maximum nesting depth of a parameter name (0 = unlimited)
    #[arg(long, global = true, default_value = "128")]
    pub max_depth: usize,

    /// Process inputs exceeding --max-size limit
    #[arg(long, global = true)]
    pub force: bool,
}
