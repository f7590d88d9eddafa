use std::time::{Duration, Instant};

use fcars::Grid;

pub trait Recorder {
    type Str: AsRef<str>;

    /// Records one zoom step that produced `model` in `elapsed`
    fn record(&mut self, model: &Grid, elapsed: Duration);

    fn has_report(&self) -> bool;
    fn report(&mut self) -> Self::Str;
}

pub struct SimpleRecord {
    steps: usize,
    size: usize,
    alive: usize,
    last_elapsed: Duration,
    last_report: Instant,
}
impl SimpleRecord {
    pub fn new(model: &Grid) -> Self {
        Self {
            steps: 0,
            size: model.size(),
            alive: model.alive_count(),
            last_elapsed: Duration::ZERO,
            last_report: Instant::now(),
        }
    }
}
impl Recorder for SimpleRecord {
    type Str = String;

    fn record(&mut self, model: &Grid, elapsed: Duration) {
        self.steps += 1;
        self.size = model.size();
        self.alive = model.alive_count();
        self.last_elapsed = elapsed;
    }

    fn has_report(&self) -> bool {
        self.last_report.elapsed().as_millis() >= 500
    }
    fn report(&mut self) -> Self::Str {
        self.last_report = Instant::now();
        format!(
            "steps:{} size:{} alive:{} last:{:.02}ms",
            self.steps,
            self.size,
            self.alive,
            self.last_elapsed.as_secs_f64() * 1000.0
        )
    }
}

pub struct CsvRecord {
    inner: SimpleRecord,
    data: Vec<(u128, usize, usize)>,
}
impl CsvRecord {
    pub fn new(model: &Grid) -> Self {
        Self {
            inner: SimpleRecord::new(model),
            data: Vec::new(),
        }
    }

    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        use std::{
            fs,
            io::{self, Write},
        };

        let file = fs::File::create(path)?;
        let mut file = io::BufWriter::new(file);

        file.write_all(b"step,delta_t,size,alive\n")?;
        for (i, (delta, size, alive)) in self.data.iter().enumerate() {
            writeln!(file, "{},{},{},{}", i, delta, size, alive)?;
        }
        file.flush()
    }
}
impl Recorder for CsvRecord {
    type Str = <SimpleRecord as Recorder>::Str;

    fn record(&mut self, model: &Grid, elapsed: Duration) {
        self.data
            .push((elapsed.as_micros(), model.size(), model.alive_count()));
        self.inner.record(model, elapsed);
    }

    fn has_report(&self) -> bool {
        self.inner.has_report()
    }
    fn report(&mut self) -> Self::Str {
        self.inner.report()
    }
}

pub enum SwitchRecorder {
    Csv(CsvRecord),
    Simple(SimpleRecord),
}
impl SwitchRecorder {
    pub fn new(model: &Grid, csv: bool) -> Self {
        if csv {
            Self::Csv(CsvRecord::new(model))
        } else {
            Self::Simple(SimpleRecord::new(model))
        }
    }

    /// Writes the csv, a no-op unless recording one
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        match self {
            Self::Csv(r) => r.save(path),
            Self::Simple(_) => Ok(()),
        }
    }
}
impl Recorder for SwitchRecorder {
    type Str = String;

    fn record(&mut self, model: &Grid, elapsed: Duration) {
        match self {
            Self::Csv(r) => r.record(model, elapsed),
            Self::Simple(r) => r.record(model, elapsed),
        }
    }
    fn has_report(&self) -> bool {
        match self {
            Self::Csv(r) => r.has_report(),
            Self::Simple(r) => r.has_report(),
        }
    }
    fn report(&mut self) -> Self::Str {
        match self {
            Self::Csv(r) => r.report(),
            Self::Simple(r) => r.report(),
        }
    }
}
