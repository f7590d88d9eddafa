use anyhow::{Context, Result, bail};
use fcars::{Base64Model, Grid, ModelCodec, PaintGrid, Pos2, RuleId, ShareParams, paint};

pub const DEFAULT_BASE_URL: &str = "index.html";

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn options() -> getopts::Options {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("c", "console", "run in console mode");
        opts.optflag("t", "threads", "generate models on all cores");
        opts.optopt("r", "rule", "rule id, 0 to 65535 (default 1385)", "RULE");
        opts.optopt("m", "model", "encoded seed model", "MODEL");
        opts.optopt("u", "url", "read rule and seed from a shared link", "URL");
        opts.optopt("e", "edit", "read the seed from editor text", "FILE");
        opts.optopt("f", "fill", "seed fill: center, random, alternating, all, empty", "TYPE");
        opts.optopt("s", "size", "seed size for --fill (default 3)", "SIZE");
        opts.optopt("g", "gens", "number of zoom steps", "COUNT");
        opts.optopt("x", "focus", "zoom-in focus, defaults to the centre", "X,Y");
        opts.optopt("d", "display", "display size in cells (default 256)", "CELLS");
        opts.optopt("o", "output", "write the final model to a file", "FILE");
        opts.optopt("", "format", "output format: b64, text, rle (default b64)", "FORMAT");
        opts.optopt("", "stats", "write stats csv to file", "FILE");
        opts.optopt("", "history", "number of undo steps (default 1)", "DEPTH");
        opts.optopt("", "base", "base of printed share links", "URL");
        opts
    }

    /// Parses the arguments, `None` when only help was asked for
    fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>> {
        let opts = Self::options();
        let matches = opts.parse(args.iter().map(T::as_ref))?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: fcars [options]"));
            Ok(None)
        } else {
            Ok(Some(Self { matches }))
        }
    }
    pub fn from_env() -> Result<Option<Self>> {
        let env = std::env::args().collect::<Vec<_>>();
        Self::new(&env[1..])
    }

    fn get<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        self.matches
            .opt_get(name)
            .map_err(|err| anyhow::anyhow!("invalid --{}: {}", name, err))
    }

    pub fn console(&self) -> bool {
        self.matches.opt_present("console")
    }
    pub fn multithreading(&self) -> bool {
        self.matches.opt_present("threads")
    }

    pub fn rule(&self) -> Result<Option<RuleId>> {
        self.matches
            .opt_str("rule")
            .map(|r| r.parse().with_context(|| format!("invalid --rule {:?}", r)))
            .transpose()
    }
    pub fn model(&self) -> Option<String> {
        self.matches.opt_str("model")
    }
    pub fn url(&self) -> Option<String> {
        self.matches.opt_str("url")
    }
    pub fn edit_file(&self) -> Option<String> {
        self.matches.opt_str("edit")
    }

    /// The parameters of `--url`, empty when no link was given
    pub fn share_params(&self) -> ShareParams {
        self.url()
            .map(|url| ShareParams::from_url(&url))
            .unwrap_or_default()
    }

    /// Picks the rule: `--rule`, then the link's rule id, then 1385
    pub fn pick_rule(&self, params: &ShareParams) -> Result<RuleId> {
        Ok(match self.rule()? {
            Some(rule) => rule,
            None => params.rule_or_default(),
        })
    }

    /// Picks the seed: editor text, then an encoded model, then the link's
    /// model, then a fill, then the built-in seed
    pub fn pick_seed(&self, params: &ShareParams) -> Result<Grid> {
        let edit_text = match self.edit_file() {
            Some(file_name) => Some(
                std::fs::read_to_string(&file_name)
                    .with_context(|| format!("read editor text {}", file_name))?,
            ),
            None => None,
        };
        self.seed_from(edit_text.as_deref(), params)
    }

    fn seed_from(&self, edit_text: Option<&str>, params: &ShareParams) -> Result<Grid> {
        if let Some(text) = edit_text {
            match PaintGrid::parse(&paint::clean_unknown_margins(text)).and_then(|p| p.resolve()) {
                Ok(grid) => return Ok(grid),
                Err(err) => log::warn!("ignoring --edit: {}", err),
            }
        }

        if let Some(encoded) = self.model() {
            match Base64Model.decode(&encoded) {
                Ok(grid) => return Ok(grid),
                Err(err) => log::warn!("ignoring --model: {}", err),
            }
        }

        if let Some(grid) = params.model() {
            return Ok(grid);
        }

        if let Some(fill) = self.fill_mode()? {
            return Ok(fill.create_seed(self.seed_size()?));
        }

        Ok(Grid::seed())
    }

    pub fn fill_mode(&self) -> Result<Option<FillMode>> {
        match self.matches.opt_str("fill") {
            Some(mode) => match FillMode::new(&mode) {
                Some(fill) => Ok(Some(fill)),
                None => bail!("invalid --fill {:?}", mode),
            },
            None => Ok(None),
        }
    }
    pub fn seed_size(&self) -> Result<usize> {
        match self.get::<usize>("size")?.unwrap_or(3) {
            0 => bail!("--size must be at least 1"),
            size => Ok(size),
        }
    }

    /// Number of zoom steps; unbounded in console mode unless given
    pub fn generations(&self) -> Result<usize> {
        let default = if self.console() { usize::MAX } else { 1 };
        Ok(self.get("gens")?.unwrap_or(default))
    }
    pub fn focus(&self) -> Result<Option<Pos2>> {
        let Some(focus) = self.matches.opt_str("focus") else {
            return Ok(None);
        };
        let parsed = focus
            .split_once(',')
            .and_then(|(x, y)| Some(Pos2::new(x.trim().parse().ok()?, y.trim().parse().ok()?)));
        match parsed {
            Some(pos) => Ok(Some(pos)),
            None => bail!("invalid --focus {:?}, expected X,Y", focus),
        }
    }
    pub fn display(&self) -> Result<u32> {
        Ok(self.get("display")?.unwrap_or(256))
    }

    pub fn output_file(&self) -> Option<String> {
        self.matches.opt_str("output")
    }
    pub fn output_format(&self) -> Result<OutputFormat> {
        let format = self.matches.opt_str("format");
        match format.as_deref().unwrap_or("b64") {
            "b64" => Ok(OutputFormat::Base64),
            "text" => Ok(OutputFormat::Text),
            "rle" => Ok(OutputFormat::Rle),
            other => bail!("invalid --format {:?}", other),
        }
    }
    pub fn stats_file(&self) -> Option<String> {
        self.matches.opt_str("stats")
    }
    pub fn history(&self) -> Result<usize> {
        Ok(self.get("history")?.unwrap_or(1))
    }
    pub fn base_url(&self) -> String {
        self.matches
            .opt_str("base")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Base64,
    Text,
    Rle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Center,
    Random,
    Alternating,
    All,
    Empty,
}
impl FillMode {
    fn new<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "center" => Some(Self::Center),
            "random" => Some(Self::Random),
            "alternating" => Some(Self::Alternating),
            "all" => Some(Self::All),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }

    fn fill_cell<R: rand::Rng>(&self, cell: Pos2, size: i32, rng: &mut R) -> bool {
        match self {
            Self::Center => cell.x == size / 2 && cell.y == size / 2,
            Self::Random => rng.random_bool(0.5),
            Self::Alternating => (cell.x + cell.y) % 2 == 0,
            Self::All => true,
            Self::Empty => false,
        }
    }

    pub fn create_seed(self, size: usize) -> Grid {
        let mut grid = Grid::new(size);
        let mut rng = rand::rng();
        for y in 0..size {
            for x in 0..size {
                let cell = Pos2::new(x as i32, y as i32);
                if self.fill_cell(cell, size as i32, &mut rng) {
                    grid.set(x, y, true);
                }
            }
        }
        grid
    }
}
