// SNMP pass_persist command loop over stdin/stdout.
//
// One command is fully answered (and flushed) before the next line is read.
// Malformed input gets the protocol's sentinel (`NONE`/`END`), never a
// session abort; only EOF ends the loop.

use crate::cache::SnapshotCache;
use crate::cadvisor_repo::ContainerSource;
use crate::oid::Oid;
use crate::table::{MetricTable, TypedValue};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

/// snmpd sends max-repetitions itself; this only covers garbled requests.
const DEFAULT_MAX_REPETITIONS: usize = 10;

/// Run the protocol session until EOF. Each table-touching command reads the
/// snapshot exactly once and answers from a single `MetricTable`, so one
/// command always sees a consistent view.
pub async fn run<S, R, W>(cache: &SnapshotCache<S>, reader: R, mut writer: W) -> io::Result<()>
where
    S: ContainerSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        if command == "PING" {
            write_line(&mut writer, "PONG").await?;
        } else if let Some(arg) = command.strip_prefix("get ") {
            handle_get(cache, &mut writer, arg.trim()).await?;
        } else if command == "getnext" || command.starts_with("getnext ") {
            // The OID arrives inline or on the following line.
            let arg = command.strip_prefix("getnext").unwrap_or_default();
            let oid_arg = match read_argument(arg, &mut lines).await? {
                Some(a) => a,
                None => {
                    write_line(&mut writer, "END").await?;
                    writer.flush().await?;
                    continue;
                }
            };
            handle_walk(cache, &mut writer, &oid_arg, 1).await?;
        } else if command == "getbulk" || command.starts_with("getbulk ") {
            let arg = command.strip_prefix("getbulk").unwrap_or_default();
            let (oid_arg, max_repetitions) =
                match read_bulk_arguments(arg, &mut lines).await? {
                    Some(parsed) => parsed,
                    None => {
                        write_line(&mut writer, "END").await?;
                        writer.flush().await?;
                        continue;
                    }
                };
            handle_walk(cache, &mut writer, &oid_arg, max_repetitions).await?;
        } else {
            write_line(&mut writer, "NONE").await?;
        }
        writer.flush().await?;
    }
    Ok(())
}

/// Inline argument after the verb, or the next line when the verb came bare.
async fn read_argument<R: AsyncBufRead + Unpin>(
    inline: &str,
    lines: &mut Lines<R>,
) -> io::Result<Option<String>> {
    let inline = inline.trim();
    if !inline.is_empty() {
        return Ok(Some(inline.to_string()));
    }
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

/// getbulk framing: `getbulk <non-repeaters> <max-repetitions> <oid>` on one
/// line, or the three values on the following lines. Non-repeaters is
/// accepted and ignored; the table has no scalar prefix.
async fn read_bulk_arguments<R: AsyncBufRead + Unpin>(
    inline: &str,
    lines: &mut Lines<R>,
) -> io::Result<Option<(String, usize)>> {
    let parts: Vec<&str> = inline.split_whitespace().collect();
    if parts.len() >= 3 {
        let max_repetitions = parts[1].parse().unwrap_or(DEFAULT_MAX_REPETITIONS);
        return Ok(Some((parts[parts.len() - 1].to_string(), max_repetitions)));
    }

    let Some(_non_repeaters) = lines.next_line().await? else {
        return Ok(None);
    };
    let Some(max_line) = lines.next_line().await? else {
        return Ok(None);
    };
    let Some(oid_line) = lines.next_line().await? else {
        return Ok(None);
    };
    let max_repetitions = max_line.trim().parse().unwrap_or(DEFAULT_MAX_REPETITIONS);
    Ok(Some((oid_line.trim().to_string(), max_repetitions)))
}

async fn handle_get<S, W>(cache: &SnapshotCache<S>, writer: &mut W, oid_arg: &str) -> io::Result<()>
where
    S: ContainerSource,
    W: AsyncWrite + Unpin,
{
    let snapshot = cache.current().await;
    let table = MetricTable::from_snapshot(&snapshot);
    let found = oid_arg
        .parse::<Oid>()
        .ok()
        .and_then(|oid| table.get(&oid).cloned().map(|value| (oid, value)));
    match found {
        Some((oid, value)) => write_triple(writer, &oid, &value).await,
        None => write_line(writer, "NONE").await,
    }
}

/// Shared by getnext (count 1) and getbulk. Emits up to `count` triples
/// after `oid_arg`, then `END` if the table ran out first.
async fn handle_walk<S, W>(
    cache: &SnapshotCache<S>,
    writer: &mut W,
    oid_arg: &str,
    count: usize,
) -> io::Result<()>
where
    S: ContainerSource,
    W: AsyncWrite + Unpin,
{
    let Ok(oid) = oid_arg.parse::<Oid>() else {
        return write_line(writer, "END").await;
    };
    let snapshot = cache.current().await;
    let table = MetricTable::from_snapshot(&snapshot);
    let results = table.next_batch(&oid, count);
    let emitted = results.len();
    for (entry_oid, value) in results {
        write_triple(writer, entry_oid, value).await?;
    }
    if emitted < count {
        write_line(writer, "END").await?;
    }
    Ok(())
}

async fn write_triple<W: AsyncWrite + Unpin>(
    writer: &mut W,
    oid: &Oid,
    value: &TypedValue,
) -> io::Result<()> {
    write_line(writer, &oid.to_string()).await?;
    write_line(writer, value.type_tag()).await?;
    write_line(writer, &value.render()).await
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await
}
