use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use product_console::config::{self, Config};
use product_console::infrastructure::logger::Logger;
use product_console::{
    dispatch, run_shell, Action, Command, LookupForm, ProductClient, ProductConsole, ProductForm,
};
use tokio::io::BufReader;
use tracing::info;

/// ProductFunction 命令行客户端
#[derive(Parser)]
#[command(name = "product-console", version)]
#[command(about = "对 ProductFunction 接口执行增删改查")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 覆盖配置中的服务根地址
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 创建产品 (POST)
    Create(ProductArgs),
    /// 更新产品 (PUT)
    Update(ProductArgs),
    /// 按 id 和 Category 读取产品
    Read(KeyArgs),
    /// 按 id 和 Category 删除产品
    Delete(KeyArgs),
    /// 列出所有产品
    List,
    /// 交互模式
    Shell,
    /// 写出默认配置文件
    InitConfig {
        #[arg(default_value = "product-console.toml")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long, default_value = "")]
    id: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, alias = "Category", default_value = "")]
    category: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    price: String,
}

#[derive(Args)]
struct KeyArgs {
    #[arg(long, default_value = "")]
    id: String,
    #[arg(long, alias = "Category", default_value = "")]
    category: String,
}

impl From<ProductArgs> for ProductForm {
    fn from(args: ProductArgs) -> Self {
        ProductForm {
            id: args.id,
            name: args.name,
            category: args.category,
            price: args.price,
        }
    }
}

impl From<KeyArgs> for LookupForm {
    fn from(args: KeyArgs) -> Self {
        LookupForm {
            id: args.id,
            category: args.category,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { path } = &cli.command {
        Config::default().save_to_file(path)?;
        println!("已写出默认配置: {}", path.display());
        return Ok(());
    }

    let config_path = config::locate_config_file(cli.config.as_deref());
    let mut config = config::load_config(cli.config.as_deref())?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    config.validate()?;

    let guard = Logger::init(&config.logging)?;
    match &config_path {
        Some(path) => info!("从配置文件加载: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    let client = ProductClient::new(&config.api)?;
    info!(endpoint = %client.endpoint(), "ProductFunction 客户端就绪");
    let mut console = ProductConsole::new(client);

    let mut stdout = io::stdout();
    let command = match cli.command {
        Commands::Create(args) => Command::Save(Action::Create, args.into()),
        Commands::Update(args) => Command::Save(Action::Update, args.into()),
        Commands::Read(args) => Command::Read(args.into()),
        Commands::Delete(args) => Command::Delete(args.into()),
        Commands::List => Command::List,
        Commands::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_shell(&mut console, stdin, &mut stdout).await?;
            drop(guard);
            return Ok(());
        }
        Commands::InitConfig { .. } => return Ok(()),
    };

    dispatch(&mut console, command, &mut stdout).await?;

    // 列表请求失败时表格内容不可信，同样按失败退出
    if console.output().is_error() || console.list_failed() {
        drop(guard);
        std::process::exit(1);
    }
    Ok(())
}
