#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeMode {
    None,
    Picker,
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub effort: Option<String>,
    pub model: Option<String>,
    pub append_system_prompt: Option<String>,
    pub system_prompt: Option<String>,
    pub resume: ResumeMode,
    pub skip_permissions: bool,
    pub debug_print: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            effort: None,
            model: None,
            append_system_prompt: None,
            system_prompt: None,
            resume: ResumeMode::None,
            skip_permissions: false,
            debug_print: false,
        }
    }
}

pub fn parse_cli_args(args: impl IntoIterator<Item = impl AsRef<str>>) -> CliOptions {
    let mut args = args
        .into_iter()
        .map(|arg| arg.as_ref().to_string())
        .peekable();
    let mut opts = CliOptions::default();

    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--resume=") {
            opts.resume = ResumeMode::Id(value.to_string());
            continue;
        }
        match arg.as_str() {
            "--effort" => opts.effort = args.next(),
            "--model" => opts.model = args.next(),
            "--append-system-prompt" => opts.append_system_prompt = args.next(),
            "--system-prompt" => opts.system_prompt = args.next(),
            "-r" | "--resume" => match args.peek() {
                Some(next) if !next.starts_with('-') => {
                    opts.resume = ResumeMode::Id(next.to_string());
                    let _ = args.next();
                }
                _ => opts.resume = ResumeMode::Picker,
            },
            "--dangerously-skip-permissions" => opts.skip_permissions = true,
            "--debug-print" => opts.debug_print = true,
            _ => {}
        }
    }

    opts
}

/// Argument vector for the claude subprocess: stream-json framing on both
/// ends, plus whatever the user asked to pass through.
pub fn build_claude_args(opts: &CliOptions, resume_session: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = [
        "--print",
        "--output-format",
        "stream-json",
        "--input-format",
        "stream-json",
        "--verbose",
        "--include-partial-messages",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    if let Some(effort) = opts.effort.as_deref() {
        args.push("--effort".to_string());
        args.push(effort.to_string());
    }
    if let Some(model) = opts.model.as_deref() {
        args.push("--model".to_string());
        args.push(model.to_string());
    }
    if let Some(prompt) = opts.append_system_prompt.as_deref() {
        args.push("--append-system-prompt".to_string());
        args.push(prompt.to_string());
    }
    if let Some(prompt) = opts.system_prompt.as_deref() {
        args.push("--system-prompt".to_string());
        args.push(prompt.to_string());
    }
    if opts.skip_permissions {
        args.push("--dangerously-skip-permissions".to_string());
    }
    if let Some(session_id) = resume_session {
        args.push("--resume".to_string());
        args.push(session_id.to_string());
    }

    args
}
