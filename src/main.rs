use std::{
    env,
    fs,
    process::exit,
    time::Instant,
};

use paqhp::{
    Config, Mode,
    Decoder, Encoder,
    CodecError,
};

fn run(cfg: &Config) -> Result<(), CodecError> {
    let time = Instant::now();
    let data = fs::read(&cfg.input)?;

    match cfg.mode {
        Mode::Compress => {
            let out = Encoder::new(cfg.level).encode(&data);
            fs::write(&cfg.output, &out)?;
            if !cfg.quiet {
                println!(" {} bytes -> {} bytes ({:.3} bpc) in {:.2?}",
                    data.len(), out.len(),
                    out.len() as f64 * 8.0 / data.len().max(1) as f64,
                    time.elapsed()
                );
            }
        }
        Mode::Extract => {
            let in_len = data.len();
            let out = Decoder::new(data)?.decode();
            fs::write(&cfg.output, &out)?;
            if !cfg.quiet {
                println!(" {} bytes -> {} bytes in {:.2?}",
                    in_len, out.len(), time.elapsed()
                );
            }
        }
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let cfg = match Config::new(&args) {
        Ok(cfg) => cfg,
        Err(err) => {
            println!("{err}");
            exit(1);
        }
    };
    if !cfg.quiet {
        println!("{cfg}");
    }
    if let Err(err) = run(&cfg) {
        println!("{err}");
        exit(1);
    }
}
