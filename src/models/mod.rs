pub mod academic_year;
pub mod catalog;
pub mod class;
pub mod pagination;
pub mod records;
pub mod schedule;
pub mod status;
pub mod student;
pub mod user;
pub mod validation;

pub use academic_year::{AcademicYear, NewAcademicYearRequest, UpdateAcademicYearRequest};
pub use catalog::{CatalogEntry, Major, NewCatalogEntryRequest, Subject, UpdateCatalogEntryRequest};
pub use class::{ClassFilter, ClassRoom, ClassView, EnrollRequest, Enrollment, NewClassRequest, UpdateClassRequest};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use records::{
    AcademicRecord, Attendance, AttendanceStatus, Guardian, NewAcademicRecordRequest,
    NewAttendanceRequest, NewGuardianRequest, Relationship,
};
pub use schedule::{NewScheduleRequest, Schedule, ScheduleFilter, TimeRange, UpdateScheduleRequest};
pub use status::Status;
pub use student::{
    EnrolledStudent, Gender, NewStudentRequest, Student, StudentFilter, StudentStatus,
    UpdateStudentRequest,
};
pub use user::{LoginRequest, LoginResponse, NewUserRequest, Role, UpdateUserRequest, User};
pub use validation::ValidationError;
