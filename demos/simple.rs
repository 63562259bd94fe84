use robdd_rs::session::Session;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let session = Session::default();
    let engine = session.engine();
    println!("engine = {:?}", engine);

    println!("zero = {}", engine.zero());
    println!("one = {}", engine.one());

    let h1 = session.create(3)?;
    let h2 = session.create(3)?;
    println!("h1 = {} -> {}", h1, session.resolve(h1)?);
    println!("h2 = {} -> {}", h2, session.resolve(h2)?);

    let h3 = session.and(h1, h2)?;
    println!("h3 = h1 AND h2 = {} -> {}", h3, session.resolve(h3)?);

    let f = session.register(engine.mk_cube([(0, true), (1, false)]));
    let g = session.register(engine.mk_clause([(1, true), (2, false)]));
    let fg = session.and(f, g)?;

    let node = session.resolve(fg)?;
    println!("f = {}", engine.to_bracket_string(session.resolve(f)?));
    println!("g = {}", engine.to_bracket_string(session.resolve(g)?));
    println!("f AND g = {}", engine.to_bracket_string(node));
    println!("sat_count(f AND g, 3) = {}", engine.sat_count(node, 3));
    if let Some(literals) = engine.one_sat(node) {
        println!("one_sat(f AND g) = {:?}", literals);
    }
    println!("dot:\n{}", engine.to_dot(&[node]));

    for h in [h1, h2, h3, f, g, fg] {
        session.dispose(h);
    }
    println!("live handles = {}", session.live_handles());
    println!("engine = {:?}", engine);

    Ok(())
}
