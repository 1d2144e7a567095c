pub mod ref_name;

/// Names rejected for branches and tags: leading `.` or `/`, `..`, `/.`,
/// trailing `/` or `.lock`, `@{`, control characters and glob/revision syntax
pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
