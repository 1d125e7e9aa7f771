#![allow(dead_code)]

pub const ZEEPOOL: &str = "
  pool: zeepool
 state: DEGRADED
status: One or more devices could not be opened.  Sufficient replicas exist for
        the pool to continue functioning in a degraded state.
action: Attach the missing device and online it using 'zpool online'.
   see: http://www.sun.com/msg/ZFS-8000-2Q
 scrub: none requested
config:

        NAME          STATE     READ WRITE CKSUM
        zeepool       ONLINE       0     0     0
          mirror-0    ONLINE       0     0     0
            c1t2d0    ONLINE       0     0     0
            spare-1   ONLINE       0     0     0
              c2t3d0  ONLINE       0     0     0  90K resilvered
              c2t1d0  ONLINE       0     0     0
        spares
          c2t3d0      INUSE     currently in use

errors: No known data errors
";

/// Modern output: tab-indented config, `scan:` line, raidz vdevs.
pub const TANK: &str = "  pool: tank
 state: ONLINE
  scan: scrub repaired 0B in 02:11:09 with 0 errors on Sun Feb  9 00:25:01 2026
config:

\tNAME        STATE     READ WRITE CKSUM
\ttank        ONLINE       0     0     0
\t  raidz2-0  ONLINE       0     0     0
\t    sda     ONLINE       0     0     0
\t    sdb     ONLINE       0     0     0
\t    sdc     ONLINE       0     0     2
\t    sdd     ONLINE       0     0     0
\t  raidz2-1  ONLINE       0     0     0
\t    sde     ONLINE       0     0     0
\t    sdf     ONLINE       0     0     0
\t    sdg     ONLINE       0     0     0
\t    sdh     ONLINE       0     0     0

errors: No known data errors
";

pub const BOOT_POOL: &str = "  pool: boot-pool
 state: ONLINE
  scan: none requested
config:

\tNAME        STATE     READ WRITE CKSUM
\tboot-pool   ONLINE       0     0     0
\t  nvme0n1p2 ONLINE       0     0     0

errors: No known data errors
";

pub const LIST: &str = "
boot-pool       33822867456     1469919232      32352948224     0       4       1.00    ONLINE  -
tank    41970420416512  20504386473984  21466033942528  0       48      1.00    ONLINE  /mnt
";
