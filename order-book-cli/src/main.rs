//! # Order Book CLI
//!
//! A command-line interface for driving a single-symbol limit order book.
//!
//! Provides one-shot subcommands for submitting orders, querying levels and
//! directory state, and an interactive REPL for scripting a sequence of
//! operations against one in-process book.

use clap::{Parser, Subcommand};
use order_book_core::{Order, OrderId, Orderbook, Price, Quantity, Side};
use std::io::{self, Write};

#[derive(Parser)]
#[command(name = "order-book-cli")]
#[command(about = "A limit order book CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an order and match it against the book
    #[command(name = "match")]
    Match {
        side: Side,
        price: Price,
        quantity: Quantity,
        id: OrderId,
    },
    /// Place a buy order (interactive mode)
    #[command(name = "buy")]
    Buy {
        price: Price,
        quantity: Quantity,
        id: Option<OrderId>,
    },
    /// Place a sell order (interactive mode)
    #[command(name = "sell")]
    Sell {
        price: Price,
        quantity: Quantity,
        id: Option<OrderId>,
    },
    /// Change a resting order's quantity, or cancel it with quantity 0
    #[command(name = "modify")]
    Modify { id: OrderId, quantity: Quantity },
    /// Query the cached resting volume at a price level
    #[command(name = "volume")]
    Volume { side: Side, price: Price },
    /// Look up a live order by id
    #[command(name = "lookup")]
    Lookup { id: OrderId },
    /// Check whether an id is currently live
    #[command(name = "exists")]
    Exists { id: OrderId },
    /// Show current order book state
    #[command(name = "book", aliases = ["state", "b"])]
    Book,
    /// Show market depth
    #[command(name = "depth")]
    Depth {
        #[arg(default_value = "5")]
        levels: usize,
    },
    /// Clear the order book (interactive mode)
    #[command(name = "clear")]
    Clear,
    /// Exit interactive mode
    #[command(name = "quit", aliases = ["exit", "q"])]
    Quit,
    /// Start interactive mode
    #[command(name = "interactive")]
    Interactive,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => run_interactive_mode(),
        Some(Commands::Match { side, price, quantity, id }) => {
            let mut book = Orderbook::new();
            let order = Order::new(id, price, quantity, side);
            let matches = book.match_order(&order);
            if matches == 0 {
                println!("Order placed. No trades executed.");
            } else {
                println!("Order executed! Matched {matches} resting order(s).");
            }
        }
        Some(Commands::Modify { id, quantity }) => {
            let mut book = Orderbook::new();
            book.modify_order_by_id(id, quantity);
            println!("No such order in a fresh book; nothing to modify.");
        }
        Some(Commands::Volume { side, price }) => {
            let book = Orderbook::new();
            println!("Volume at {side} {price}: {}", book.get_volume_at_level(side, price));
        }
        Some(Commands::Lookup { id }) => {
            let book = Orderbook::new();
            match book.lookup_order_by_id(id) {
                Ok(order) => order_book_core::diagnostics::print_order(&order),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Exists { id }) => {
            let book = Orderbook::new();
            println!("{}", book.order_exists(id));
        }
        Some(Commands::Interactive) => run_interactive_mode(),
        Some(Commands::Buy { .. })
        | Some(Commands::Sell { .. })
        | Some(Commands::Book)
        | Some(Commands::Depth { .. })
        | Some(Commands::Clear)
        | Some(Commands::Quit) => {
            eprintln!("This command is only available in interactive mode.");
            eprintln!("Use: cargo run --bin order-book-cli -- interactive");
            std::process::exit(1);
        }
    }
}

fn parse_interactive_command(input: &str) -> Result<Commands, String> {
    let args = shlex::split(input).ok_or("Invalid command syntax")?;
    if args.is_empty() {
        return Err("Empty command".to_string());
    }

    let mut full_args = vec!["order-book-cli".to_string()];
    full_args.extend(args);

    match Cli::try_parse_from(full_args) {
        Ok(cli) => match cli.command {
            Some(command) => Ok(command),
            None => Err("Interactive mode not available within interactive mode".to_string()),
        },
        Err(e) => Err(e.to_string()),
    }
}

fn run_interactive_mode() {
    println!("=== Order Book Interactive CLI ===");
    println!("Type 'help' for available commands, 'quit' to exit\n");

    let mut book = Orderbook::new();
    let mut next_id: OrderId = 1;

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_interactive_command(trimmed) {
                    Ok(command) => match command {
                        Commands::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        Commands::Buy { price, quantity, id } => {
                            let order_id = id.unwrap_or_else(|| {
                                let id = next_id;
                                next_id += 1;
                                id
                            });
                            submit_and_report(&mut book, Order::new(order_id, price, quantity, Side::Buy));
                        }
                        Commands::Sell { price, quantity, id } => {
                            let order_id = id.unwrap_or_else(|| {
                                let id = next_id;
                                next_id += 1;
                                id
                            });
                            submit_and_report(&mut book, Order::new(order_id, price, quantity, Side::Sell));
                        }
                        Commands::Modify { id, quantity } => {
                            book.modify_order_by_id(id, quantity);
                            println!("Order {id} updated.");
                        }
                        Commands::Volume { side, price } => {
                            println!("Volume at {side} {price}: {}", book.get_volume_at_level(side, price));
                        }
                        Commands::Lookup { id } => match book.lookup_order_by_id(id) {
                            Ok(order) => order_book_core::diagnostics::print_order(&order),
                            Err(e) => println!("Error: {e}"),
                        },
                        Commands::Exists { id } => println!("{}", book.order_exists(id)),
                        Commands::Book => order_book_core::diagnostics::print_orderbook(&book),
                        Commands::Clear => {
                            book = Orderbook::new();
                            next_id = 1;
                            println!("Order book cleared.");
                        }
                        Commands::Depth { levels } => print_market_depth(&book, levels),
                        Commands::Match { .. } | Commands::Interactive => {
                            println!("Command not available in interactive mode.");
                        }
                    },
                    Err(e) => {
                        if trimmed == "help" || trimmed == "h" {
                            show_help();
                        } else if e.contains("unexpected argument") || e.contains("invalid value") {
                            println!("Invalid command. Type 'help' for available commands.");
                        } else if e.contains("required arguments") {
                            println!("Missing required arguments. Type 'help' for usage.");
                        } else {
                            println!("Error: {}", e.lines().next().unwrap_or("Invalid command"));
                        }
                    }
                }
            }
            Err(error) => {
                println!("Error reading input: {error}");
                break;
            }
        }
    }
}

fn submit_and_report(book: &mut Orderbook, order: Order) {
    let id = order.id;
    let matches = book.match_order(&order);
    if matches == 0 {
        println!("Order {id} placed. No trades executed.");
    } else {
        println!("Order {id} executed! Matched {matches} resting order(s).");
    }
}

fn show_help() {
    println!("Available Commands:");
    println!("  buy <price> <quantity> [id]    - Place a buy order (e.g., buy 100 10)");
    println!("  sell <price> <quantity> [id]   - Place a sell order (e.g., sell 100 10)");
    println!("  modify <id> <quantity>         - Change quantity, or cancel with 0");
    println!("  volume <side> <price>          - Show cached resting volume at a level");
    println!("  lookup <id>                    - Show a live order's fields");
    println!("  exists <id>                    - Check whether an id is live");
    println!("  book | state | b               - Show current order book state");
    println!("  depth [levels]                 - Show market depth (default: 5 levels)");
    println!("  clear                          - Clear the order book");
    println!("  help | h                       - Show this help message");
    println!("  quit | exit | q                - Exit the CLI");
    println!();
    println!("Tips:");
    println!("  - Prices and quantities are raw integer ticks");
    println!("  - IDs are auto-generated if not provided");
    println!("  - Orders are matched using price-time priority");
    println!();
}

fn print_market_depth(book: &Orderbook, levels: usize) {
    let sell_depth: Vec<_> = book.levels(Side::Sell).take(levels).collect();
    let buy_depth: Vec<_> = book.levels(Side::Buy).rev().take(levels).collect();

    if sell_depth.is_empty() && buy_depth.is_empty() {
        return;
    }

    println!("  Market Depth:");
    for (price, volume) in sell_depth.iter().rev() {
        println!("    {volume} @ {price}");
    }
    if !sell_depth.is_empty() && !buy_depth.is_empty() {
        println!("    ---------------");
    }
    for (price, volume) in &buy_depth {
        println!("    {volume} @ {price}");
    }
}
