//! 命令解析、分发与交互式 shell

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::model::{Action, LookupForm, ProductForm};
use super::service::ProductConsole;
use crate::core::error::CommandError;

const HELP: &str = "\
可用命令:
  create id=<id> name=<name> category=<category> price=<price>
  update id=<id> name=<name> category=<category> price=<price>
  read   id=<id> category=<category>
  delete id=<id> category=<category>
  list
  help
  quit";

/// 一条用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Save(Action, ProductForm),
    Read(LookupForm),
    Delete(LookupForm),
    List,
    Help,
    Quit,
}

/// 命令执行后 shell 是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 解析一行输入，空行返回 `None`
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "create" | "update" => {
            let action: Action = name.parse()?;
            let mut form = ProductForm::default();
            for (key, value) in parse_pairs(args)? {
                match key.as_str() {
                    "id" => form.id = value,
                    "name" => form.name = value,
                    "category" => form.category = value,
                    "price" => form.price = value,
                    _ => return Err(CommandError::UnknownField(key)),
                }
            }
            Command::Save(action, form)
        }
        "read" | "delete" => {
            let mut form = LookupForm::default();
            for (key, value) in parse_pairs(args)? {
                match key.as_str() {
                    "id" => form.id = value,
                    "category" => form.category = value,
                    _ => return Err(CommandError::UnknownField(key)),
                }
            }
            if name.eq_ignore_ascii_case("read") {
                Command::Read(form)
            } else {
                Command::Delete(form)
            }
        }
        "list" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

/// 按空白切分，双引号内的空白保留
fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_pairs(args: &[String]) -> Result<Vec<(String, String)>, CommandError> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.to_ascii_lowercase(), value.to_string()))
                .ok_or_else(|| CommandError::MalformedArgument(arg.clone()))
        })
        .collect()
}

/// 执行命令，并把发生变化的展示面写到 `out`
pub async fn dispatch<W: Write>(
    console: &mut ProductConsole,
    command: Command,
    out: &mut W,
) -> io::Result<Flow> {
    debug!(?command, "执行命令");
    match command {
        Command::Save(action, form) => {
            console.create_or_update(action, &form).await;
            write_output(console, out)?;
            if !console.output().is_error() {
                write_table(console, out)?;
            }
        }
        Command::Read(form) => {
            console.read_product(&form).await;
            write_output(console, out)?;
        }
        Command::Delete(form) => {
            console.delete_product(&form).await;
            write_output(console, out)?;
            if !console.output().is_error() {
                write_table(console, out)?;
            }
        }
        Command::List => {
            console.load_all_products().await;
            write_table(console, out)?;
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// 交互式 shell：启动时先加载产品列表，然后逐行执行命令直到 EOF 或 quit
pub async fn run_shell<R, W>(console: &mut ProductConsole, input: R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.load_all_products().await;
    write_table(console, out)?;
    writeln!(out, "输入 help 查看可用命令")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_line(&line) {
            Ok(Some(command)) => {
                if dispatch(console, command, out).await? == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
    Ok(())
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn write_output<W: Write>(console: &ProductConsole, out: &mut W) -> io::Result<()> {
    let output = console.output();
    writeln!(out, "{}", output.text())?;
    if let Some(at) = output.updated_at() {
        writeln!(out, "更新于 {}", at.format(TIME_FORMAT))?;
    }
    Ok(())
}

fn write_table<W: Write>(console: &ProductConsole, out: &mut W) -> io::Result<()> {
    let table = console.table();
    writeln!(out, "{}", table.render())?;
    if console.list_failed() {
        writeln!(out, "产品列表加载失败，表格未更新")?;
    }
    match table.refreshed_at() {
        Some(at) => writeln!(out, "刷新于 {}", at.format(TIME_FORMAT)),
        None => writeln!(out, "尚未加载"),
    }
}
