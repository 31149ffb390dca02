//! SeaORM entity models
//!
//! Database entities for Circle Classroom

mod profile;
mod classroom;
mod student;
mod assignment;
mod grade;
mod attendance;
mod notice;
mod timetable;
mod school;
mod announcement;
mod api_key;
mod audit_log;
mod platform_metric;

pub use profile::{
    Entity as ProfileEntity,
    Model as Profile,
    ActiveModel as ProfileActiveModel,
    Column as ProfileColumn,
    Role,
};

pub use classroom::{
    Entity as ClassroomEntity,
    Model as Classroom,
    ActiveModel as ClassroomActiveModel,
    Column as ClassroomColumn,
};

pub use student::{
    Entity as StudentEntity,
    Model as Student,
    ActiveModel as StudentActiveModel,
    Column as StudentColumn,
};

pub use assignment::{
    Entity as AssignmentEntity,
    Model as Assignment,
    ActiveModel as AssignmentActiveModel,
    Column as AssignmentColumn,
    GradeBand,
    GradeBands,
};

pub use grade::{
    Entity as GradeEntity,
    Model as Grade,
    ActiveModel as GradeActiveModel,
    Column as GradeColumn,
};

pub use attendance::{
    Entity as AttendanceEntity,
    Model as Attendance,
    ActiveModel as AttendanceActiveModel,
    Column as AttendanceColumn,
    AttendanceStatus,
};

pub use notice::{
    Entity as NoticeEntity,
    Model as Notice,
    ActiveModel as NoticeActiveModel,
    Column as NoticeColumn,
};

pub use timetable::{
    Entity as TimetableEntity,
    Model as TimetableEntry,
    ActiveModel as TimetableActiveModel,
    Column as TimetableColumn,
    DayOfWeek,
};

pub use school::{
    Entity as SchoolEntity,
    Model as School,
    ActiveModel as SchoolActiveModel,
    Column as SchoolColumn,
    SchoolStatus,
    SubscriptionTier,
};

pub use announcement::{
    Entity as AnnouncementEntity,
    Model as Announcement,
    ActiveModel as AnnouncementActiveModel,
    Column as AnnouncementColumn,
    Priority,
};

pub use api_key::{
    Entity as ApiKeyEntity,
    Model as ApiKey,
    ActiveModel as ApiKeyActiveModel,
    Column as ApiKeyColumn,
};

pub use audit_log::{
    Entity as AuditLogEntity,
    Model as AuditLog,
    ActiveModel as AuditLogActiveModel,
    Column as AuditLogColumn,
};

pub use platform_metric::{
    Entity as PlatformMetricEntity,
    Model as PlatformMetric,
    ActiveModel as PlatformMetricActiveModel,
    Column as PlatformMetricColumn,
};
