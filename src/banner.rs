use std::io;
use std::io::Write;

const RULE: &str = "================================================================================";
const SHADE: &str = "▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓";

const LOGO: &str = r"
     _                     _             _
  __| |_ __ ___ ___  _ __ | |_ _ __ ___ | |
 / _` | '__/ __/ _ \| '_ \| __| '__/ _ \| |
| (_| | | | (_| (_) | | | | |_| | | (_) | |
 \__,_|_|  \___\___/|_| |_|\__|_|  \___/|_|
";

const BOARD_LAYOUT: &str = r"
+---------------------------------------------+
|                                             |
|   +--------+               +--------+       |
|   | Relay 1|               | Relay 5|       |
|   +--------+               +--------+       |
|   +--------+               +--------+       |
|   | Relay 2|               | Relay 6|       |
|   +--------+               +--------+       |
|   +--------+               +--------+       |
|   | Relay 3|               | Relay 7|       |
|   +--------+               +--------+       |
|   +--------+               +--------+       |
|   | Relay 4|               | Relay 8|       |
|   +--------+               +--------+       |
|                                             |
|            +-------------------+            |
|            | Relay Driver chip |            |
|            +-------------------+            |
|                                             |
| +-----------------+  +-------------------+  |
| |     DC Input    |  |   USB connector   |  |
| +-----------------+  +-------------------+  |
|                                             |
+---------------------------------------------+
";

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{}", SHADE)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Name: Direction Controller for 8 channel USB relay module")?;
    writeln!(out, "Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "{}", LOGO)?;
    writeln!(out)?;
    writeln!(out, "below is your board layout:")?;
    writeln!(out, "{}", BOARD_LAYOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_shows_version_and_every_relay() {
        let mut out = Vec::new();
        write_banner(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(env!("CARGO_PKG_VERSION")));
        assert!(out.contains(SHADE));
        assert!(out.contains(r"| (_| | | | (_| (_) | | | | |_| | | (_) | |"));
        for n in 1..=8 {
            assert!(out.contains(&format!("Relay {}", n)));
        }
    }
}
