use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["beanverdict", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_and_seed_commands() {
    let cli =
        Cli::try_parse_from(["beanverdict", "db", "migrate"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));

    let cli = Cli::try_parse_from(["beanverdict", "db", "seed"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["beanverdict"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn search_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "beanverdict",
        "search",
        "oat latte",
        "--lat",
        "30.27",
        "--lng",
        "-97.74",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Search {
            query,
            lat,
            lng,
            location,
        }) => {
            assert_eq!(query, "oat latte");
            assert_eq!(lat, Some(30.27));
            assert_eq!(lng, Some(-97.74));
            assert!(location.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn search_with_location_text() {
    let cli = Cli::try_parse_from(["beanverdict", "search", "mocha", "--location", "Austin, TX"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Search { location: Some(ref l), lat: None, .. }) if l == "Austin, TX"
    ));
}

#[test]
fn lat_without_lng_is_rejected() {
    assert!(Cli::try_parse_from(["beanverdict", "search", "mocha", "--lat", "30.2"]).is_err());
}

#[test]
fn parses_place_command() {
    let cli =
        Cli::try_parse_from(["beanverdict", "place", "osm-1001"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Place { ref place_id }) if place_id == "osm-1001"
    ));
}

#[test]
fn search_requires_a_query() {
    assert!(Cli::try_parse_from(["beanverdict", "search"]).is_err());
}

#[test]
fn parses_shop_command() {
    let cli = Cli::try_parse_from(["beanverdict", "shop", "42"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Shop { shop_id: 42 })));
}

#[test]
fn shop_id_must_be_numeric() {
    assert!(Cli::try_parse_from(["beanverdict", "shop", "osm-1"]).is_err());
}
